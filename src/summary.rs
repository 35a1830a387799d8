use crate::shared::Scalar;

/// Tag under which the regularized total loss is recorded.
pub const TOTAL_LOSS_TAG: &str = "loss_total";
/// Tag under which the regularization penalty alone is recorded.
pub const REGULARIZATION_LOSS_TAG: &str = "loss_regularization_only";

/// A single named scalar observation for the monitoring sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSummary<A> {
    tag: String,
    value: A,
}

impl<A: Scalar> ScalarSummary<A> {
    pub fn new(tag: impl Into<String>, value: A) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> A {
        self.value
    }
}

/// A mergeable bundle of scalar summaries, handed off as one unit to an
/// external summary writer.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBundle<A> {
    scalars: Vec<ScalarSummary<A>>,
}

impl<A: Scalar> SummaryBundle<A> {
    pub fn merge(scalars: impl IntoIterator<Item = ScalarSummary<A>>) -> Self {
        Self {
            scalars: scalars.into_iter().collect(),
        }
    }

    pub fn scalars(&self) -> &[ScalarSummary<A>] {
        &self.scalars
    }

    /// Looks up the first scalar recorded under `tag`.
    pub fn get(&self, tag: &str) -> Option<A> {
        self.scalars
            .iter()
            .find(|scalar| scalar.tag == tag)
            .map(|scalar| scalar.value)
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}
