//! Pattern classification
//!
//! Flat accumulator over `(pattern, keyword, weight)` rows. Each pattern's
//! bucket collects the weight of every distinct keyword found in the
//! description; confidence is the bucket's share of all collected weight.

use crate::error::ClassifierError;
use crate::matcher::KeywordMatcher;
use nodeforge_model::{IndicatorTable, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rationale used when the caller pins the pattern
pub const DECLARED_RATIONALE: &str = "explicitly declared";

/// Rationale used when no indicator matched
pub const FALLBACK_RATIONALE: &str = "no indicators matched; defaulting to simplest pattern";

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecommendation {
    /// Recommended pattern
    pub pattern: Pattern,
    /// Share of matched indicator weight, in `0.0..=1.0`
    pub confidence: f64,
    /// Human-readable justification
    pub rationale: String,
}

impl PatternRecommendation {
    /// Create a recommendation
    #[inline]
    #[must_use]
    pub fn new(pattern: Pattern, confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            pattern,
            confidence,
            rationale: rationale.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledIndicator {
    pattern: Pattern,
    weight: f64,
    matchers: Vec<KeywordMatcher>,
}

#[derive(Debug, Default)]
struct Bucket {
    score: f64,
    keywords: Vec<String>,
}

/// Keyword-weighted pattern classifier
///
/// Built once from an indicator table and then used read-only; cloning is
/// cheap enough to hand one to each worker.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    indicators: Vec<CompiledIndicator>,
    order: Vec<Pattern>,
}

impl PatternClassifier {
    /// Compile the indicator table into matchers
    ///
    /// # Errors
    /// Returns error if a keyword cannot be compiled
    pub fn new(table: &IndicatorTable) -> Result<Self, ClassifierError> {
        let mut indicators = Vec::with_capacity(table.indicators().len());
        for indicator in table.indicators() {
            let matchers = indicator
                .keywords
                .iter()
                .map(|keyword| {
                    KeywordMatcher::new(keyword).map_err(|source| ClassifierError::Keyword {
                        pattern: indicator.pattern.to_string(),
                        keyword: keyword.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            indicators.push(CompiledIndicator {
                pattern: indicator.pattern,
                weight: indicator.weight,
                matchers,
            });
        }

        tracing::debug!(indicators = indicators.len(), "pattern classifier compiled");

        Ok(Self {
            indicators,
            order: table.pattern_order(),
        })
    }

    /// Rank patterns for a description
    ///
    /// A declared pattern short-circuits the keyword engine. Otherwise every
    /// pattern with at least one hit is returned, by descending confidence;
    /// equal confidences keep the pattern order of the indicator table. When
    /// nothing matches, a single WORKFLOW fallback with confidence 0 is
    /// returned. The result is never empty.
    #[must_use]
    pub fn classify(&self, description: &str, declared: Option<Pattern>) -> Vec<PatternRecommendation> {
        if let Some(pattern) = declared {
            tracing::debug!(%pattern, "pattern declared; keyword scoring skipped");
            return vec![PatternRecommendation::new(pattern, 1.0, DECLARED_RATIONALE)];
        }

        let mut buckets: Vec<Bucket> = self.order.iter().map(|_| Bucket::default()).collect();
        let mut seen: HashSet<(Pattern, &str)> = HashSet::new();

        for indicator in &self.indicators {
            let Some(slot) = self.order.iter().position(|p| *p == indicator.pattern) else {
                continue;
            };
            for matcher in &indicator.matchers {
                if !seen.insert((indicator.pattern, matcher.keyword())) {
                    continue;
                }
                if matcher.is_match(description) {
                    buckets[slot].score += indicator.weight;
                    buckets[slot].keywords.push(matcher.keyword().to_string());
                }
            }
        }

        let total: f64 = buckets.iter().map(|b| b.score).sum();
        if total <= 0.0 {
            tracing::debug!("no indicators matched; falling back to WORKFLOW");
            return vec![PatternRecommendation::new(Pattern::Workflow, 0.0, FALLBACK_RATIONALE)];
        }

        let mut ranked: Vec<PatternRecommendation> = self
            .order
            .iter()
            .zip(&buckets)
            .filter(|(_, bucket)| bucket.score > 0.0)
            .map(|(pattern, bucket)| {
                let rationale = format!(
                    "matched keywords: {} ({:.1} of {:.1} total indicator weight)",
                    bucket.keywords.join(", "),
                    bucket.score,
                    total
                );
                PatternRecommendation::new(*pattern, bucket.score / total, rationale)
            })
            .collect();

        // Stable sort keeps table order among equal confidences.
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        tracing::debug!(
            top = %ranked[0].pattern,
            confidence = ranked[0].confidence,
            candidates = ranked.len(),
            "description classified"
        );
        ranked
    }

    /// Highest-ranked recommendation
    #[must_use]
    pub fn best(&self, description: &str, declared: Option<Pattern>) -> PatternRecommendation {
        self.classify(description, declared)
            .into_iter()
            .next()
            .unwrap_or_else(|| PatternRecommendation::new(Pattern::Workflow, 0.0, FALLBACK_RATIONALE))
    }
}
