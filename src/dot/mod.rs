//! Schema to Graphviz DOT compiler.
//!
//! Entities become rounded boxes, attributes become ellipses hanging off their
//! entity, and relationships become diamonds wired between two entities with
//! the cardinality on each edge. The compiler is total over [`Schema`]: a
//! relationship that names an unknown entity still produces its edges.

pub mod graph;
pub mod style;

pub use graph::{Attr, DotGraph, Statement};
pub use style::DotStyle;

use crate::schema::Schema;

/// Name of the emitted digraph.
const GRAPH_NAME: &str = "ERD";

/// Compiles `schema` into DOT text.
#[must_use]
pub fn compile(schema: &Schema, style: DotStyle) -> String {
    build(schema, style).render()
}

/// Builds the statement list for `schema` without rendering it.
#[must_use]
pub fn build(schema: &Schema, style: DotStyle) -> DotGraph {
    let theme = style.theme();
    let mut graph = DotGraph::new(GRAPH_NAME);

    graph.comment(theme.header_comment);
    for line in theme.header {
        graph.raw(*line);
    }
    graph.blank();

    graph.comment("Entities");
    for name in schema.entities.keys() {
        graph.node(name.as_str(), with_label(theme.entity, name.as_str()));
    }
    graph.blank();

    graph.comment("Attributes");
    for (entity_name, entity) in &schema.entities {
        for (attr_name, attr) in &entity.attributes {
            let node_id = format!("{entity_name}_{attr_name}");
            let attrs = if attr.is_key {
                with_label(theme.key_attribute, format!("<{attr_name}>"))
            } else {
                with_label(theme.plain_attribute, attr_name.as_str())
            };
            graph.node(node_id.as_str(), attrs);
            graph.edge(node_id, entity_name.as_str(), theme.attribute_edge.to_vec());
        }
    }
    graph.blank();

    graph.comment("Relationships");
    for (rel_name, rel) in &schema.relationships {
        let node_id = format!("rel_{rel_name}");
        graph.node(node_id.as_str(), with_label(theme.relationship, rel_name.as_str()));
        graph.edge(
            rel.entity1.as_str(),
            node_id.as_str(),
            labelled_edge(theme.relationship_edge, rel.left_label()),
        );
        graph.edge(
            node_id,
            rel.entity2.as_str(),
            labelled_edge(theme.relationship_edge, rel.right_label()),
        );
    }

    graph
}

fn with_label(base: &[Attr], label: impl Into<String>) -> Vec<Attr> {
    let mut attrs = base.to_vec();
    attrs.push(Attr::label(label));
    attrs
}

fn labelled_edge(base: &[Attr], label: &str) -> Vec<Attr> {
    let mut attrs = Vec::with_capacity(base.len() + 1);
    attrs.push(Attr::label(label));
    attrs.extend_from_slice(base);
    attrs
}
