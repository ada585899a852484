//! Literal styling for the two diagram variants.

use super::graph::Attr;

/// Which set of literal style attributes the compiler emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DotStyle {
    /// Fill colors only.
    #[default]
    Plain,
    /// Adds outline colors, pen widths and a background.
    Enhanced,
}

impl DotStyle {
    /// Picks [`DotStyle::Enhanced`] when `styled` is set.
    #[must_use]
    pub fn from_flag(styled: bool) -> Self {
        if styled {
            Self::Enhanced
        } else {
            Self::Plain
        }
    }

    pub(crate) fn theme(self) -> &'static Theme {
        match self {
            Self::Plain => &PLAIN,
            Self::Enhanced => &ENHANCED,
        }
    }
}

/// Per-statement attribute lists. Node lists are followed by a `label`; edge
/// lists are preceded by one when the edge carries a cardinality.
pub(crate) struct Theme {
    pub header_comment: &'static str,
    pub header: &'static [&'static str],
    pub entity: &'static [Attr],
    pub key_attribute: &'static [Attr],
    pub plain_attribute: &'static [Attr],
    pub attribute_edge: &'static [Attr],
    pub relationship: &'static [Attr],
    pub relationship_edge: &'static [Attr],
}

static PLAIN: Theme = Theme {
    header_comment: "Graph settings",
    header: &[
        "rankdir=LR;",
        r#"node [fontname="Arial"];"#,
        r#"edge [fontname="Arial", fontsize=10];"#,
    ],
    entity: &[
        Attr::bare("shape", "box"),
        Attr::quoted("style", "rounded,filled"),
        Attr::quoted("fillcolor", "#90EE90"),
    ],
    key_attribute: &[
        Attr::bare("shape", "ellipse"),
        Attr::bare("style", "filled"),
        Attr::quoted("fillcolor", "#FFD700"),
    ],
    plain_attribute: &[
        Attr::bare("shape", "ellipse"),
        Attr::bare("style", "filled"),
        Attr::quoted("fillcolor", "#E0E0E0"),
    ],
    attribute_edge: &[Attr::bare("arrowhead", "none")],
    relationship: &[
        Attr::bare("shape", "diamond"),
        Attr::bare("style", "filled"),
        Attr::quoted("fillcolor", "#87CEEB"),
    ],
    relationship_edge: &[Attr::bare("arrowhead", "none")],
};

static ENHANCED: Theme = Theme {
    header_comment: "Graph styling",
    header: &[
        r##"graph [bgcolor="#f8f9fa", pad="0.5", ranksep="2", nodesep="1.5"];"##,
        "rankdir=LR;",
        r#"node [fontname="Arial", fontsize=12];"#,
        r##"edge [fontname="Arial", fontsize=10, color="#666666"];"##,
    ],
    entity: &[
        Attr::bare("shape", "box"),
        Attr::quoted("style", "rounded,filled"),
        Attr::quoted("fillcolor", "#90EE90"),
        Attr::quoted("color", "#228B22"),
        Attr::bare("penwidth", "2"),
    ],
    key_attribute: &[
        Attr::bare("shape", "ellipse"),
        Attr::bare("style", "filled"),
        Attr::quoted("fillcolor", "#FFD700"),
        Attr::quoted("color", "#DAA520"),
        Attr::bare("penwidth", "1.5"),
    ],
    plain_attribute: &[
        Attr::bare("shape", "ellipse"),
        Attr::bare("style", "filled"),
        Attr::quoted("fillcolor", "#E8E8E8"),
        Attr::quoted("color", "#999999"),
        Attr::bare("penwidth", "1.5"),
    ],
    attribute_edge: &[Attr::bare("arrowhead", "none"), Attr::quoted("color", "#999999")],
    relationship: &[
        Attr::bare("shape", "diamond"),
        Attr::bare("style", "filled"),
        Attr::quoted("fillcolor", "#87CEEB"),
        Attr::quoted("color", "#4682B4"),
        Attr::bare("penwidth", "2"),
    ],
    relationship_edge: &[
        Attr::bare("arrowhead", "none"),
        Attr::quoted("color", "#4682B4"),
        Attr::quoted("fontcolor", "#333333"),
    ],
};
