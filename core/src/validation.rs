//! Lint checks for entity models, as surfaced while editing.

use crate::model::{EntityModel, Matcher};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref FIELD_VAR: Regex = Regex::new(r"\{\{\s*field\s*\}\}").expect("valid regex");
    static ref VALUE_VAR: Regex = Regex::new(r"\{\{\s*value\s*\}\}").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Attributes,
    Resolvers,
    Matchers,
    Indices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub level: Level,
    pub section: Section,
    /// Object name; index fields are reported as `index.field`.
    pub name: String,
    pub message: String,
}

impl Finding {
    fn new(level: Level, section: Section, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level, section, name: name.into(), message: message.into() }
    }
}

pub fn has_errors(findings: &[Finding]) -> bool { findings.iter().any(|f| f.level == Level::Error) }

/// Run every check over the model. Findings come out by section, then name.
pub fn validate(model: &EntityModel) -> Vec<Finding> {
    let mut out = Vec::new();

    for (name, attribute) in &model.attributes {
        let Some(score) = attribute.score else { continue };
        let section = Section::Attributes;
        if !(0.0..=1.0).contains(&score) {
            out.push(Finding::new(Level::Error, section, name, "Attribute score must be between 0.0 and 1.0."));
        } else if score == 1.0 {
            out.push(Finding::new(Level::Warning, section, name, "An attribute score of 1.0 will cause the final identity confidence score to always be 1.0, regardless of the scores of other matching attributes."));
        } else if score == 0.0 {
            out.push(Finding::new(Level::Warning, section, name, "An attribute score of 0.0 will cause the final identity confidence score to always be 0.0, regardless of the scores of other matching attributes."));
        } else if score < 0.5 {
            out.push(Finding::new(Level::Warning, section, name, "An attribute score of less than 0.5 will penalize the final identity confidence score."));
        } else if score == 0.5 {
            out.push(Finding::new(Level::Info, section, name, "An attribute score of 0.5 will never affect the final identity confidence score."));
        }
    }

    for (name, resolver) in &model.resolvers {
        let section = Section::Resolvers;
        match resolver.attributes.len() {
            0 => out.push(Finding::new(Level::Error, section, name, "A resolver must have at least one attribute.")),
            1 => out.push(Finding::new(Level::Info, section, name, "A best practice is to define more than one attribute in a resolver to help avoid false matches.")),
            _ => {}
        }
        for attr in &resolver.attributes {
            if !model.attributes.contains_key(attr) {
                out.push(Finding::new(Level::Error, section, name, format!("Resolver references undefined attribute \"{attr}\".")));
            }
        }
    }

    for (name, matcher) in &model.matchers {
        let section = Section::Matchers;
        let clause = clause_text(matcher);
        if !FIELD_VAR.is_match(&clause) {
            out.push(Finding::new(Level::Warning, section, name, "The {{ field }} variable is not defined in the matcher clause."));
        }
        if !VALUE_VAR.is_match(&clause) {
            out.push(Finding::new(Level::Warning, section, name, "The {{ value }} variable is not defined in the matcher clause."));
        }
        if matcher.quality == Some(0.0) {
            out.push(Finding::new(Level::Warning, section, name, "A quality score of 0.0 will cause the attribute match score to always be 0.5, which means this matcher will have no effect on the final identity confidence score."));
        }
    }

    for (index_name, index) in &model.indices {
        let section = Section::Indices;
        for (field_name, field) in &index.fields {
            let name = format!("{index_name}.{field_name}");
            if field.attribute.trim().is_empty() {
                out.push(Finding::new(Level::Error, section, &name, "Attribute is required."));
            } else if !model.attributes.contains_key(&field.attribute) {
                out.push(Finding::new(Level::Error, section, &name, format!("Index field references undefined attribute \"{}\".", field.attribute)));
            }
            if let Some(matcher) = &field.matcher {
                if !model.matchers.contains_key(matcher) {
                    out.push(Finding::new(Level::Error, section, &name, format!("Index field references undefined matcher \"{matcher}\".")));
                }
            }
            if field.quality == Some(0.0) {
                out.push(Finding::new(Level::Warning, section, &name, "A quality score of 0.0 will cause the attribute match score to always be 0.5, which means this index field will have no effect on the final identity confidence score."));
            }
        }
    }

    out
}

fn clause_text(matcher: &Matcher) -> String {
    match &matcher.clause {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
