use serde::Serialize;
use thiserror::Error;

pub const QUERY_SYNTAX_ERROR: &str = "Query syntax error";

/// Raised when a search-bar query cannot be turned into a resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuerySyntaxError {
    #[error("attribute value query syntax must be name:value separated by a colon")]
    AttributeValue { attribute: String },
    #[error("unsupported query syntax")]
    Unsupported,
    #[error("unterminated quoted value")]
    UnterminatedQuote,
    #[error("missing attribute name")]
    MissingAttributeName,
}

/// The `{error, message}` payload surfaced to the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl QuerySyntaxError {
    pub fn body(&self) -> ErrorBody {
        ErrorBody { error: QUERY_SYNTAX_ERROR.to_string(), message: self.to_string() }
    }
}
