use crate::error::QuerySyntaxError;
use crate::query::{ClauseKind, Occur, Operator, ParsedQuery};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValues {
    pub values: Vec<String>,
}

/// Attribute values and free-text terms of a resolution request, deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionInput {
    pub attributes: BTreeMap<String, AttributeValues>,
    pub terms: Vec<String>,
}

impl ResolutionInput {
    pub fn is_empty(&self) -> bool { self.attributes.is_empty() && self.terms.is_empty() }

    /// Rebuild the equivalent parsed query, one equality clause per value.
    pub fn to_parsed_query(&self) -> ParsedQuery {
        let mut query = ParsedQuery::new();
        for (name, attr) in &self.attributes {
            let clauses = query.field.entry(name.clone()).or_default();
            clauses.extend(attr.values.iter().map(crate::query::Clause::field_eq));
        }
        query.term.extend(self.terms.iter().map(crate::query::Clause::term));
        query
    }
}

/// Convert a parsed search-bar query into resolution input.
///
/// Only `must` equality field clauses and `must` term clauses are supported.
pub fn translate(query: &ParsedQuery) -> Result<ResolutionInput, QuerySyntaxError> {
    tracing::debug!("translating search bar query");

    let mut attr_values: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (name, clauses) in &query.field {
        let values = attr_values.entry(name.as_str()).or_default();
        for clause in clauses {
            if clause.occur != Occur::Must || clause.operator != Some(Operator::Eq) || clause.kind != ClauseKind::Field {
                return Err(QuerySyntaxError::AttributeValue { attribute: name.clone() });
            }
            values.insert(clause.value.as_str());
        }
    }

    let mut terms: BTreeSet<&str> = BTreeSet::new();
    for clause in &query.term {
        if clause.occur != Occur::Must || clause.kind != ClauseKind::Term {
            return Err(QuerySyntaxError::Unsupported);
        }
        terms.insert(clause.value.as_str());
    }

    let input = ResolutionInput {
        attributes: attr_values
            .into_iter()
            .map(|(name, values)| {
                let values = values.into_iter().map(str::to_string).collect();
                (name.to_string(), AttributeValues { values })
            })
            .collect(),
        terms: terms.into_iter().map(str::to_string).collect(),
    };
    tracing::debug!(attributes = input.attributes.len(), terms = input.terms.len(), "translated query");
    Ok(input)
}

/// Parse search-bar text and translate it in one step.
pub fn translate_text(text: &str) -> Result<ResolutionInput, QuerySyntaxError> {
    translate(&crate::query::parse(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Clause;

    #[test]
    fn empty_query_is_not_an_error() {
        let input = translate(&ParsedQuery::new()).unwrap();
        assert!(input.attributes.is_empty());
        assert!(input.terms.is_empty());
    }

    #[test]
    fn field_without_clauses_is_still_emitted() {
        let mut q = ParsedQuery::new();
        q.field.insert("phone".into(), vec![]);
        let input = translate(&q).unwrap();
        assert_eq!(input.attributes["phone"].values, Vec::<String>::new());
    }

    #[test]
    fn duplicates_collapse() {
        let mut q = ParsedQuery::new();
        q.push_field("name", Clause::field_eq("Bo"));
        q.push_field("name", Clause::field_eq("Al"));
        q.push_field("name", Clause::field_eq("Bo"));
        q.push_term(Clause::term(" "));
        q.push_term(Clause::term(" "));
        let input = translate(&q).unwrap();
        assert_eq!(input.attributes["name"].values, vec!["Al", "Bo"]);
        assert_eq!(input.terms, vec![" "]);
    }
}
