pub mod error;
pub mod model;
pub mod persist;
pub mod query;
pub mod resolution;
pub mod score;
pub mod translate;
pub mod validation;

pub use error::{ErrorBody, QuerySyntaxError};
pub use model::{Attribute, AttributeType, EntityModel, Index, IndexField, Matcher, Resolver};
pub use resolution::ResolutionRequest;
pub use score::{MatchStrength, ResolverScore};
pub use translate::{translate, translate_text, AttributeValues, ResolutionInput};
