use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type AttributeName = String;
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type", default)]
    pub kind: AttributeType,
    /// Prior match confidence of a single matching occurrence. `None` contributes nothing.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolver {
    #[serde(default)]
    pub attributes: Vec<AttributeName>,
    #[serde(default)]
    pub weight: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    /// Query template with `{{ field }}` and `{{ value }}` placeholders.
    pub clause: Value,
    #[serde(default)]
    pub quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexField {
    #[serde(default)]
    pub attribute: AttributeName,
    #[serde(default)]
    pub matcher: Option<String>,
    #[serde(default)]
    pub quality: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    #[serde(default)]
    pub fields: BTreeMap<String, IndexField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityModel {
    #[serde(default)]
    pub attributes: BTreeMap<AttributeName, Attribute>,
    #[serde(default)]
    pub resolvers: BTreeMap<String, Resolver>,
    #[serde(default)]
    pub matchers: BTreeMap<String, Matcher>,
    #[serde(default)]
    pub indices: BTreeMap<String, Index>,
}

impl EntityModel {
    pub fn new() -> Self { Self::default() }

    /// Base score of an attribute, if the attribute exists and has one.
    pub fn attribute_score(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(|a| a.score)
    }
}
