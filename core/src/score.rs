//! Resolver confidence scores.
//!
//! Attribute scores are treated as independent probabilities of a true match and combined
//! as `p / (p + q)`, where `p` is the product of the scores and `q` the product of their
//! complements. A single score of exactly 1.0 forces the result to 1.0, and a single 0.0
//! forces it to 0.0.

use crate::model::{Attribute, EntityModel, Resolver};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Qualitative strength of a combined score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    GuaranteedMatch,
    VeryStrongMatch,
    StrongMatch,
    ModerateMatch,
    WeakMatch,
    NoDecision,
    LikelyFalseMatch,
    GuaranteedFalseMatch,
    /// Not a number, or out of range.
    Unknown,
}

impl MatchStrength {
    /// Bands are checked top-down; the first that holds wins.
    pub fn classify(score: f64) -> Self {
        if score == 1.0 {
            Self::GuaranteedMatch
        } else if (0.99..1.0).contains(&score) {
            Self::VeryStrongMatch
        } else if (0.9..0.99).contains(&score) {
            Self::StrongMatch
        } else if (0.75..0.9).contains(&score) {
            Self::ModerateMatch
        } else if score > 0.5 && score < 0.75 {
            Self::WeakMatch
        } else if score == 0.5 {
            Self::NoDecision
        } else if score > 0.0 && score < 0.5 {
            Self::LikelyFalseMatch
        } else if score == 0.0 {
            Self::GuaranteedFalseMatch
        } else {
            Self::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GuaranteedMatch => "Guaranteed match",
            Self::VeryStrongMatch => "Very strong match",
            Self::StrongMatch => "Strong match",
            Self::ModerateMatch => "Moderate match",
            Self::WeakMatch => "Weak match",
            Self::NoDecision => "No decision",
            Self::LikelyFalseMatch => "Likely false match",
            Self::GuaranteedFalseMatch => "Guaranteed false match",
            Self::Unknown => "-",
        }
    }
}

impl fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Combine independent attribute scores. `None` when there is nothing to combine.
pub fn combine(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let p: f64 = scores.iter().product();
    let q: f64 = scores.iter().map(|s| 1.0 - s).product();
    Some(p / (p + q))
}

/// Score a resolver's attributes against the model's attribute scores.
///
/// Unknown attributes and attributes without a score are skipped.
pub fn score<S: AsRef<str>>(resolver_attributes: &[S], attributes: &BTreeMap<String, Attribute>) -> Option<f64> {
    let scores: Vec<f64> = resolver_attributes
        .iter()
        .filter_map(|name| attributes.get(name.as_ref()).and_then(|a| a.score))
        .collect();
    combine(&scores)
}

/// A resolver's combined score together with its band and the band's display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverScore {
    pub score: Option<f64>,
    pub strength: Option<MatchStrength>,
    pub band: Option<String>,
}

impl ResolverScore {
    pub fn evaluate(resolver: &Resolver, attributes: &BTreeMap<String, Attribute>) -> Self {
        Self::from_score(score(resolver.attributes.as_slice(), attributes))
    }

    pub fn from_score(score: Option<f64>) -> Self {
        let strength = score.map(MatchStrength::classify);
        Self { score, strength, band: strength.map(|s| s.label().to_string()) }
    }
}

/// Scores for every resolver in the model, keyed by resolver name.
pub fn score_resolvers(model: &EntityModel) -> BTreeMap<String, ResolverScore> {
    model
        .resolvers
        .iter()
        .map(|(name, resolver)| (name.clone(), ResolverScore::evaluate(resolver, &model.attributes)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(MatchStrength::classify(1.0), MatchStrength::GuaranteedMatch);
        assert_eq!(MatchStrength::classify(0.99), MatchStrength::VeryStrongMatch);
        assert_eq!(MatchStrength::classify(0.989_999), MatchStrength::StrongMatch);
        assert_eq!(MatchStrength::classify(0.9), MatchStrength::StrongMatch);
        assert_eq!(MatchStrength::classify(0.75), MatchStrength::ModerateMatch);
        assert_eq!(MatchStrength::classify(0.749), MatchStrength::WeakMatch);
        assert_eq!(MatchStrength::classify(0.500_001), MatchStrength::WeakMatch);
        assert_eq!(MatchStrength::classify(0.5), MatchStrength::NoDecision);
        assert_eq!(MatchStrength::classify(0.1), MatchStrength::LikelyFalseMatch);
        assert_eq!(MatchStrength::classify(0.0), MatchStrength::GuaranteedFalseMatch);
        assert_eq!(MatchStrength::classify(f64::NAN), MatchStrength::Unknown);
        assert_eq!(MatchStrength::classify(1.5), MatchStrength::Unknown);
        assert_eq!(MatchStrength::classify(-0.2), MatchStrength::Unknown);
    }

    #[test]
    fn empty_has_no_score() {
        assert_eq!(combine(&[]), None);
        assert_eq!(ResolverScore::from_score(None).strength, None);
        assert_eq!(ResolverScore::from_score(None).band, None);
    }

    #[test]
    fn band_carries_label() {
        let nan = ResolverScore::from_score(Some(f64::NAN));
        assert_eq!(nan.strength, Some(MatchStrength::Unknown));
        assert_eq!(nan.band.as_deref(), Some("-"));
        let weak = ResolverScore::from_score(Some(0.6));
        assert_eq!(weak.band.as_deref(), Some("Weak match"));
    }

    #[test]
    fn labels() {
        assert_eq!(MatchStrength::NoDecision.to_string(), "No decision");
        assert_eq!(MatchStrength::Unknown.label(), "-");
    }
}
