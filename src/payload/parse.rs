use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Largest magnitude at which every integer is exactly representable as `f64`.
const I64_EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    NodesLinks,
    EntitiesRelationships,
}

impl Schema {
    pub fn label(self) -> &'static str {
        match self {
            Self::NodesLinks => "nodes/links",
            Self::EntitiesRelationships => "entities/relationships",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub entity_id: Option<Value>,
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub group: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub relation: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub confidence: Option<Value>,
}

/// One of the two accepted payload shapes.
#[derive(Clone, Debug)]
pub enum Payload {
    NodesLinks {
        nodes: Vec<RawNode>,
        links: Vec<RawLink>,
    },
    EntitiesRelationships {
        entities: Vec<RawNode>,
        relationships: Vec<RawLink>,
    },
}

impl Payload {
    /// Returns `None` when the value matches neither schema.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if object.contains_key("nodes") || object.contains_key("links") {
            return Some(Self::NodesLinks {
                nodes: records(object, "nodes")?,
                links: records(object, "links")?,
            });
        }

        if object.contains_key("entities") || object.contains_key("relationships") {
            return Some(Self::EntitiesRelationships {
                entities: records(object, "entities")?,
                relationships: records(object, "relationships")?,
            });
        }

        None
    }

    pub fn schema(&self) -> Schema {
        match self {
            Self::NodesLinks { .. } => Schema::NodesLinks,
            Self::EntitiesRelationships { .. } => Schema::EntitiesRelationships,
        }
    }

    pub fn into_parts(self) -> (Schema, Vec<RawNode>, Vec<RawLink>) {
        match self {
            Self::NodesLinks { nodes, links } => (Schema::NodesLinks, nodes, links),
            Self::EntitiesRelationships {
                entities,
                relationships,
            } => (Schema::EntitiesRelationships, entities, relationships),
        }
    }
}

fn records<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<Vec<T>> {
    let items = match object.get(key) {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return None,
    };

    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            debug!(key, index, "skipping non-object payload element");
            continue;
        }
        match T::deserialize(item) {
            Ok(record) => parsed.push(record),
            Err(error) => debug!(key, index, %error, "skipping unreadable payload element"),
        }
    }
    Some(parsed)
}

impl RawNode {
    pub(super) fn explicit_id(&self, schema: Schema) -> Option<String> {
        let ordered = match schema {
            Schema::NodesLinks => [&self.id, &self.entity_id],
            Schema::EntitiesRelationships => [&self.entity_id, &self.id],
        };
        first_scalar(ordered)
    }

    pub(super) fn display_label(&self, schema: Schema) -> Option<String> {
        let ordered = match schema {
            Schema::NodesLinks => [&self.label, &self.text, &self.name],
            Schema::EntitiesRelationships => [&self.text, &self.label, &self.name],
        };
        first_scalar(ordered)
    }

    pub(super) fn type_name(&self) -> Option<String> {
        first_scalar([&self.kind, &self.group])
    }
}

impl RawLink {
    pub(super) fn relation_label(&self, schema: Schema) -> Option<String> {
        let ordered = match schema {
            Schema::NodesLinks => [&self.label, &self.relation, &self.kind],
            Schema::EntitiesRelationships => [&self.relation, &self.label, &self.kind],
        };
        first_scalar(ordered)
    }

    /// `weight` wins over `confidence`; missing or non-finite is 1, negative is 0.
    pub(super) fn weight(&self) -> f32 {
        let raw = [&self.weight, &self.confidence]
            .into_iter()
            .flatten()
            .find_map(number);

        match raw {
            Some(value) if value.is_finite() => value.max(0.0) as f32,
            _ => 1.0,
        }
    }
}

/// Resolves an edge endpoint that is either a scalar id or an object reference.
pub(super) fn endpoint_id(value: Option<&Value>, schema: Schema) -> Option<String> {
    match value? {
        Value::Object(object) => {
            let keys = match schema {
                Schema::NodesLinks => ["id", "entity_id"],
                Schema::EntitiesRelationships => ["entity_id", "id"],
            };
            keys.into_iter()
                .filter_map(|key| object.get(key))
                .find_map(scalar_string)
        }
        other => scalar_string(other),
    }
}

fn first_scalar<const N: usize>(fields: [&Option<Value>; N]) -> Option<String> {
    fields.into_iter().flatten().find_map(scalar_string)
}

pub(super) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number_id(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Integral floats print as integers so `1.0` and `1` name the same node.
fn number_id(number: &Number) -> String {
    match number.as_f64() {
        Some(value)
            if number.is_f64()
                && value.is_finite()
                && value.fract() == 0.0
                && value.abs() < I64_EXACT_LIMIT =>
        {
            (value as i64).to_string()
        }
        _ => number.to_string(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
