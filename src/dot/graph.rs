//! Minimal DOT builder: an ordered list of typed statements plus a renderer.

use std::borrow::Cow;
use std::fmt::Write as _;

/// Keywords that cannot be used as unquoted DOT identifiers.
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// An attribute value, rendered either bare (`shape=box`) or quoted (`label="x"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Emitted verbatim.
    Bare(Cow<'static, str>),
    /// Emitted as a double-quoted DOT string.
    Quoted(Cow<'static, str>),
}

/// A single `key=value` pair inside a statement's attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Attribute name.
    pub key: &'static str,
    /// Attribute value.
    pub value: Value,
}

impl Attr {
    /// A bare attribute from static text.
    #[must_use]
    pub const fn bare(key: &'static str, value: &'static str) -> Self {
        Self { key, value: Value::Bare(Cow::Borrowed(value)) }
    }

    /// A quoted attribute from static text.
    #[must_use]
    pub const fn quoted(key: &'static str, value: &'static str) -> Self {
        Self { key, value: Value::Quoted(Cow::Borrowed(value)) }
    }

    /// A `label="..."` attribute with owned text.
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self { key: "label", value: Value::Quoted(Cow::Owned(text.into())) }
    }
}

/// One line of the graph body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `// text`
    Comment(Cow<'static, str>),
    /// An empty line.
    Blank,
    /// A graph-level line emitted as-is (`rankdir=LR;`).
    Raw(Cow<'static, str>),
    /// `id [attrs];`
    Node {
        /// Node identifier.
        id: String,
        /// Node attributes.
        attrs: Vec<Attr>,
    },
    /// `from -> to [attrs];`
    Edge {
        /// Tail node identifier.
        from: String,
        /// Head node identifier.
        to: String,
        /// Edge attributes.
        attrs: Vec<Attr>,
    },
}

/// A directed graph under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    name: &'static str,
    statements: Vec<Statement>,
}

impl DotGraph {
    /// Starts an empty `digraph <name>`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, statements: Vec::new() }
    }

    /// Appends a `// comment` line.
    pub fn comment(&mut self, text: impl Into<Cow<'static, str>>) -> &mut Self {
        self.statements.push(Statement::Comment(text.into()));
        self
    }

    /// Appends an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.statements.push(Statement::Blank);
        self
    }

    /// Appends a graph-level line verbatim.
    pub fn raw(&mut self, line: impl Into<Cow<'static, str>>) -> &mut Self {
        self.statements.push(Statement::Raw(line.into()));
        self
    }

    /// Appends a node statement.
    pub fn node(&mut self, id: impl Into<String>, attrs: Vec<Attr>) -> &mut Self {
        self.statements.push(Statement::Node { id: id.into(), attrs });
        self
    }

    /// Appends an edge statement.
    pub fn edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> &mut Self {
        self.statements.push(Statement::Edge { from: from.into(), to: to.into(), attrs });
        self
    }

    /// Statements in emission order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Renders the graph as DOT text. The closing brace has no trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", self.name);
        for statement in &self.statements {
            match statement {
                Statement::Comment(text) => {
                    let _ = writeln!(out, "  // {text}");
                }
                Statement::Blank => out.push('\n'),
                Statement::Raw(line) => {
                    let _ = writeln!(out, "  {line}");
                }
                Statement::Node { id, attrs } => {
                    let _ = writeln!(out, "  {}{};", render_id(id), render_attrs(attrs));
                }
                Statement::Edge { from, to, attrs } => {
                    let _ = writeln!(
                        out,
                        "  {} -> {}{};",
                        render_id(from),
                        render_id(to),
                        render_attrs(attrs)
                    );
                }
            }
        }
        out.push('}');
        out
    }
}

/// Plain identifiers pass through untouched; anything else becomes a quoted string.
fn render_id(id: &str) -> Cow<'_, str> {
    if is_plain_id(id) {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(quote(id))
    }
}

fn is_plain_id(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(id))
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn render_attrs(attrs: &[Attr]) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let body = attrs
        .iter()
        .map(|attr| match &attr.value {
            Value::Bare(value) => format!("{}={value}", attr.key),
            Value::Quoted(value) => format!("{}={}", attr.key, quote(value)),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(" [{body}]")
}
