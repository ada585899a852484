//! Entity-relationship schema extracted from a repository.
//!
//! Deserialization is lenient: absent or `null` maps become empty maps, records
//! that are not objects become defaults, unknown attribute types and
//! cardinalities are kept verbatim, and relationship endpoints are never checked
//! against the entity table. Only `entities`, `relationships` or `attributes`
//! values that are not maps at all fail to parse.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An extracted ER schema. Map order is the order the model emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Entities keyed by name.
    #[serde(default, deserialize_with = "lenient_records")]
    pub entities: IndexMap<String, Entity>,
    /// Relationships keyed by name.
    #[serde(default, deserialize_with = "lenient_records")]
    pub relationships: IndexMap<String, Relationship>,
}

impl Schema {
    /// Number of entities, reported as `tablesCount`.
    #[must_use]
    pub fn tables_count(&self) -> usize {
        self.entities.len()
    }
}

/// A table- or model-like concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Attributes keyed by name.
    #[serde(default, deserialize_with = "lenient_records")]
    pub attributes: IndexMap<String, Attribute>,
}

/// A typed field of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Declared value type.
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub kind: AttributeType,
    /// Whether the attribute is (part of) the primary key.
    #[serde(default, deserialize_with = "truthy")]
    pub is_key: bool,
}

/// Value type of an attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    /// `"string"`
    #[default]
    String,
    /// `"number"`
    Number,
    /// `"date"`
    Date,
    /// `"boolean"`
    Boolean,
    /// Anything else the model produced.
    Other(String),
}

impl AttributeType {
    /// The wire spelling of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        match value {
            AttributeType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// A named association between two entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Entity on the left-hand side.
    #[serde(default, deserialize_with = "lenient_name")]
    pub entity1: String,
    /// Entity on the right-hand side.
    #[serde(default, deserialize_with = "lenient_name")]
    pub entity2: String,
    /// Cardinality next to `entity1`.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub cardinality1: Option<Cardinality>,
    /// Cardinality next to `entity2`.
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub cardinality2: Option<Cardinality>,
}

impl Relationship {
    /// Label drawn on the `entity1` edge; `"1"` when unspecified.
    #[must_use]
    pub fn left_label(&self) -> &str {
        self.cardinality1.as_ref().map_or(Cardinality::DEFAULT_LABEL, Cardinality::as_str)
    }

    /// Label drawn on the `entity2` edge; `"1"` when unspecified.
    #[must_use]
    pub fn right_label(&self) -> &str {
        self.cardinality2.as_ref().map_or(Cardinality::DEFAULT_LABEL, Cardinality::as_str)
    }
}

/// One side of a relationship: one or many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cardinality {
    /// `"1"`
    One,
    /// `"M"`
    M,
    /// `"N"`
    N,
    /// Anything else the model produced.
    Other(String),
}

impl Cardinality {
    const DEFAULT_LABEL: &'static str = "1";

    /// The wire spelling of this cardinality.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::One => "1",
            Self::M => "M",
            Self::N => "N",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for Cardinality {
    fn from(value: String) -> Self {
        match value.as_str() {
            "1" => Self::One,
            "M" => Self::M,
            "N" => Self::N,
            _ => Self::Other(value),
        }
    }
}

impl From<Cardinality> for String {
    fn from(value: Cardinality) -> Self {
        match value {
            Cardinality::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Reads a name-keyed map of records. A record that is not an object, or that
/// still fails to read, becomes `T::default()`.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let records = Option::<IndexMap<String, Value>>::deserialize(deserializer)?;
    Ok(records
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let record = if value.is_object() {
                serde_json::from_value(value).unwrap_or_default()
            } else {
                T::default()
            };
            (name, record)
        })
        .collect())
}

/// Truthiness as a loosely typed producer means it: `true`, any non-zero
/// number, any non-empty string, and any array or object.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    })
}

/// Non-string types are kept as their JSON text.
fn lenient_type<'de, D>(deserializer: D) -> Result<AttributeType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => AttributeType::default(),
        Some(Value::String(s)) => AttributeType::from(s),
        Some(other) => AttributeType::Other(other.to_string()),
    })
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Cardinalities are falsy-defaulted: `null`, `""` and numeric `0` mean "unspecified".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Cardinality>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(Cardinality::from(s)),
        Some(Value::Number(n)) => {
            let spelled = n.to_string();
            (spelled != "0").then(|| Cardinality::from(spelled))
        }
        _ => None,
    })
}
