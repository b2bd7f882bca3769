use serde::Serialize;

use super::domain::ReviewRecord;
use super::normalizer::normalize;
use super::schema::{SubjectType, UnknownSubjectPolicy};

/// Mean of valid rating values; `display` is rounded, `mean` keeps full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateScore {
    pub mean: f64,
    pub display: f64,
    pub samples: usize,
}

impl AggregateScore {
    /// `None` when there is nothing to average; an empty input is "no score", not zero.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len() as f64;
        let mut mean = values.iter().sum::<f64>() / count;
        if !mean.is_finite() {
            // The sum overflowed; scale each value first.
            mean = values.iter().map(|value| value / count).sum();
        }
        Some(Self {
            mean,
            display: round_for_display(mean),
            samples: values.len(),
        })
    }
}

/// One decimal place, halves rounded away from zero.
pub fn round_for_display(mean: f64) -> f64 {
    let scaled = mean * 10.0;
    if !scaled.is_finite() {
        return mean;
    }
    scaled.round() / 10.0
}

/// Overall score for a subject plus how many reviews actually contributed to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub overall_score: Option<AggregateScore>,
    pub review_count: usize,
}

impl SubjectSummary {
    /// Pool per-review rating lists; reviews with no valid values are not counted.
    pub fn pooled<I>(per_review: I) -> Self
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        let mut pool = Vec::new();
        let mut review_count = 0;

        for ratings in per_review {
            if !ratings.is_empty() {
                review_count += 1;
                pool.extend(ratings);
            }
        }

        Self {
            overall_score: AggregateScore::from_values(&pool),
            review_count,
        }
    }

    pub fn display_score(&self) -> Option<f64> {
        self.overall_score.map(|score| score.display)
    }
}

/// Stateless aggregator carrying the unknown-subject policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingAggregator {
    policy: UnknownSubjectPolicy,
}

impl RatingAggregator {
    pub fn new(policy: UnknownSubjectPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnknownSubjectPolicy {
        self.policy
    }

    /// Valid ratings of one review, in category order.
    pub fn ratings(&self, review: &ReviewRecord) -> Vec<f64> {
        self.policy
            .resolve(&review.id.0, &review.subject_type)
            .map(|subject_type| ratings_as(review, subject_type))
            .unwrap_or_default()
    }

    pub fn review(&self, review: &ReviewRecord) -> Option<AggregateScore> {
        AggregateScore::from_values(&self.ratings(review))
    }

    /// Pools every valid value across all reviews before averaging.
    pub fn subject<'a, I>(&self, reviews: I) -> SubjectSummary
    where
        I: IntoIterator<Item = &'a ReviewRecord>,
    {
        SubjectSummary::pooled(reviews.into_iter().map(|review| self.ratings(review)))
    }
}

/// Valid ratings of one review scored against an already resolved category set.
pub fn ratings_as(review: &ReviewRecord, subject_type: SubjectType) -> Vec<f64> {
    review
        .category_values(subject_type)
        .into_iter()
        .filter_map(normalize)
        .collect()
}

/// Newest first; reviews recorded at the same instant keep their input order.
pub fn latest<'a, I>(reviews: I, limit: usize) -> Vec<&'a ReviewRecord>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    let mut ordered: Vec<&ReviewRecord> = reviews.into_iter().collect();
    ordered.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    ordered.truncate(limit);
    ordered
}
