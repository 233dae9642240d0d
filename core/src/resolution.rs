use crate::translate::{AttributeValues, ResolutionInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RESOLUTION_ENDPOINT: &str = "/_zentity/resolution";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionParams {
    #[serde(rename = "_explanation")]
    pub explanation: bool,
    #[serde(rename = "_score")]
    pub score: bool,
}

impl Default for ResolutionParams {
    fn default() -> Self { Self { explanation: true, score: true } }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexScope {
    pub indices: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub include: IndexScope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, AttributeValues>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// Payload for a resolution request against one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub entity_type: String,
    pub params: ResolutionParams,
    pub data: ResolutionData,
}

impl ResolutionRequest {
    /// `scope_indices` restricts the resolution to a subset of the model's indices;
    /// `None` searches all of them.
    pub fn new(entity_type: impl Into<String>, input: ResolutionInput, scope_indices: Option<Vec<String>>) -> Self {
        let ResolutionInput { attributes, terms } = input;
        let data = ResolutionData {
            attributes: (!attributes.is_empty()).then_some(attributes),
            terms: (!terms.is_empty()).then_some(terms),
            scope: scope_indices.map(|indices| Scope { include: IndexScope { indices } }),
        };
        Self { entity_type: entity_type.into(), params: ResolutionParams::default(), data }
    }

    pub fn path(&self) -> String { format!("{RESOLUTION_ENDPOINT}/{}", self.entity_type) }

    /// URL parameters sent alongside the `data` body.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("_explanation", self.params.explanation.to_string()), ("_score", self.params.score.to_string())]
    }
}
