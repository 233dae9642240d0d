use crate::error::QuerySyntaxError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r#"(?:"[^"]*"|[^\s"])+"#).expect("valid regex");
    static ref FIELD: Regex = Regex::new(r#"^([^:<>="]*)(:|>=|<=|>|<)(.*)$"#).expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    Must,
    MustNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseKind {
    Term,
    Field,
    Is,
    Group,
}

/// One clause of a search-bar query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(rename = "match")]
    pub occur: Occur,
    #[serde(rename = "type")]
    pub kind: ClauseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub value: String,
}

impl Clause {
    pub fn term(value: impl Into<String>) -> Self {
        Self { occur: Occur::Must, kind: ClauseKind::Term, operator: None, value: value.into() }
    }

    pub fn field_eq(value: impl Into<String>) -> Self {
        Self { occur: Occur::Must, kind: ClauseKind::Field, operator: Some(Operator::Eq), value: value.into() }
    }
}

/// Clauses indexed by shape: field-scoped clauses grouped by field name, free-text terms,
/// and `is:` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    #[serde(default)]
    pub field: BTreeMap<String, Vec<Clause>>,
    #[serde(default)]
    pub term: Vec<Clause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub is: Vec<Clause>,
}

impl ParsedQuery {
    pub fn new() -> Self { Self::default() }

    /// Accept clauses produced by an external parser. Any shape outside the known
    /// `match`/`operator`/`type` values is a syntax error.
    pub fn from_json(value: serde_json::Value) -> Result<Self, QuerySyntaxError> {
        serde_json::from_value(value).map_err(|err| {
            tracing::debug!(error = %err, "rejected parsed query");
            QuerySyntaxError::Unsupported
        })
    }

    pub fn is_empty(&self) -> bool { self.field.is_empty() && self.term.is_empty() && self.is.is_empty() }

    pub fn push_field(&mut self, name: impl Into<String>, clause: Clause) {
        self.field.entry(name.into()).or_default().push(clause);
    }

    pub fn push_term(&mut self, clause: Clause) { self.term.push(clause); }
}

/// Parse search-bar text: free-text terms, `name:value` pairs, double-quoted phrases,
/// `-` negation and `>`, `>=`, `<`, `<=` comparisons.
pub fn parse(text: &str) -> Result<ParsedQuery, QuerySyntaxError> {
    if text.matches('"').count() % 2 != 0 {
        return Err(QuerySyntaxError::UnterminatedQuote);
    }
    let mut query = ParsedQuery::new();
    for mat in TOKEN.find_iter(text) {
        let raw = mat.as_str();
        let (occur, body) = match raw.strip_prefix('-') {
            Some(rest) if !rest.is_empty() => (Occur::MustNot, rest),
            _ => (Occur::Must, raw),
        };
        match FIELD.captures(body) {
            Some(caps) => {
                let name = &caps[1];
                if name.is_empty() {
                    return Err(QuerySyntaxError::MissingAttributeName);
                }
                let operator = match &caps[2] {
                    ":" => Operator::Eq,
                    ">=" => Operator::Gte,
                    "<=" => Operator::Lte,
                    ">" => Operator::Gt,
                    _ => Operator::Lt,
                };
                if name == "is" && operator == Operator::Eq {
                    query.is.push(Clause { occur, kind: ClauseKind::Is, operator: None, value: unquote(&caps[3]) });
                    continue;
                }
                let clause = Clause { occur, kind: ClauseKind::Field, operator: Some(operator), value: unquote(&caps[3]) };
                query.push_field(name, clause);
            }
            None => {
                let clause = Clause { occur, kind: ClauseKind::Term, operator: None, value: unquote(body) };
                query.push_term(clause);
            }
        }
    }
    Ok(query)
}

fn unquote(s: &str) -> String { s.replace('"', "") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_terms_and_fields() {
        let q = parse(r#"first_name:Allie last_name:"Van Dyke" 202-555-1234"#).unwrap();
        assert_eq!(q.field["first_name"], vec![Clause::field_eq("Allie")]);
        assert_eq!(q.field["last_name"], vec![Clause::field_eq("Van Dyke")]);
        assert_eq!(q.term, vec![Clause::term("202-555-1234")]);
    }

    #[test]
    fn negation_and_comparisons() {
        let q = parse("-spam age>=21 -city:Paris").unwrap();
        assert_eq!(q.term[0].occur, Occur::MustNot);
        assert_eq!(q.field["age"][0].operator, Some(Operator::Gte));
        assert_eq!(q.field["age"][0].value, "21");
        assert_eq!(q.field["city"][0].occur, Occur::MustNot);
    }

    #[test]
    fn is_flags_stay_out_of_fields() {
        let q = parse("is:active -is:deleted name:Al").unwrap();
        assert!(!q.field.contains_key("is"));
        assert_eq!(q.is.len(), 2);
        assert_eq!(q.is[0].kind, ClauseKind::Is);
        assert_eq!(q.is[1].occur, Occur::MustNot);
    }

    #[test]
    fn unknown_json_shapes_are_syntax_errors() {
        let value = serde_json::json!({ "term": [{ "match": "should", "type": "term", "value": "x" }] });
        assert_eq!(ParsedQuery::from_json(value), Err(QuerySyntaxError::Unsupported));
        let value = serde_json::json!({ "field": { "name": [{ "match": "must", "operator": "eq", "type": "field", "value": "Al" }] } });
        assert_eq!(ParsedQuery::from_json(value).unwrap().field["name"], vec![Clause::field_eq("Al")]);
    }

    #[test]
    fn rejects_unbalanced_quotes() {
        assert_eq!(parse(r#"name:"Allie"#), Err(QuerySyntaxError::UnterminatedQuote));
    }

    #[test]
    fn rejects_missing_name() {
        assert_eq!(parse(":Allie"), Err(QuerySyntaxError::MissingAttributeName));
    }
}
