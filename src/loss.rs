use derive_builder::Builder;
use ndarray::{ArcArray, ArcArray1, ArcArray2, Array1, ArrayView, Dimension, IxDyn};

use crate::regularization::RegularizationAccumulator;
use crate::shared::Scalar;
use crate::summary::{ScalarSummary, SummaryBundle, REGULARIZATION_LOSS_TAG, TOTAL_LOSS_TAG};

/// Tag for the mean squared-error task loss.
pub const MSE_LOSS_TAG: &str = "loss_mse";
/// Tag for the softmax cross-entropy task loss.
pub const CROSS_ENTROPY_LOSS_TAG: &str = "loss_cross_entropy";

/// First year for which VIIRS nightlights labels replace DMSP labels.
pub const DMSP_VIIRS_TRANSITION_YEAR: i32 = 2012;

#[derive(Debug, Clone, Builder)]
pub struct NightlightsOptions {
    /// Examples dated before this year are scored against the DMSP
    /// prediction column, the rest against the VIIRS column.
    #[builder(default = "DMSP_VIIRS_TRANSITION_YEAR")]
    pub transition_year: i32,
}

impl Default for NightlightsOptions {
    fn default() -> Self {
        Self {
            transition_year: DMSP_VIIRS_TRANSITION_YEAR,
        }
    }
}

/// Breakdown of one loss computation. `total` is always `task` plus
/// `regularization`; `summaries` is present only when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct LossOutput<A> {
    pub total: A,
    pub task: A,
    pub regularization: A,
    pub summaries: Option<SummaryBundle<A>>,
}

/// Mean squared-error between labels and the per-example nightlights
/// prediction.
///
/// `preds` has one row per example: column 0 holds the DMSP prediction,
/// column 1 the VIIRS prediction. Each example is scored against the column
/// matching its year.
pub fn nightlights_loss<A: Scalar>(
    labels: ArcArray1<A>,
    preds: ArcArray2<A>,
    years: ArcArray1<i32>,
    options: &NightlightsOptions,
    regularization: &RegularizationAccumulator<A>,
    add_summaries: bool,
) -> LossOutput<A> {
    assert_eq!(labels.len(), preds.nrows());
    assert_eq!(labels.len(), years.len());
    let selected: Array1<A> = years
        .iter()
        .zip(preds.rows())
        .map(|(&year, row)| {
            if year < options.transition_year {
                row[0]
            } else {
                row[1]
            }
        })
        .collect();
    let task = mean_squared_error(labels.view(), selected.view());
    aggregate(task, MSE_LOSS_TAG, regularization, add_summaries)
}

/// Mean squared-error between labels and same-shaped predictions, either
/// `[batch]` or `[batch, labels_dim]`.
pub fn mse_loss<A: Scalar>(
    labels: ArcArray<A, IxDyn>,
    preds: ArcArray<A, IxDyn>,
    regularization: &RegularizationAccumulator<A>,
    add_summaries: bool,
) -> LossOutput<A> {
    let task = mean_squared_error(labels.view(), preds.view());
    aggregate(task, MSE_LOSS_TAG, regularization, add_summaries)
}

/// Softmax cross-entropy between integer class labels and one row of logits
/// per example, averaged over the batch.
pub fn cross_entropy_loss<A: Scalar>(
    labels: ArcArray1<usize>,
    logits: ArcArray2<A>,
    regularization: &RegularizationAccumulator<A>,
    add_summaries: bool,
) -> LossOutput<A> {
    assert_eq!(labels.len(), logits.nrows());
    if labels.is_empty() {
        return aggregate(A::zero(), CROSS_ENTROPY_LOSS_TAG, regularization, add_summaries);
    }
    // Every example carries unit weight, so the weighted-mean convention
    // reduces to dividing by the batch size.
    let count = A::value_from(labels.len()).unwrap();
    let summed = labels
        .iter()
        .zip(logits.rows())
        .fold(A::zero(), |acc, (&label, row)| {
            let max = row.fold(A::neg_infinity(), |m, &v| m.max(v));
            let log_sum_exp = max + row.fold(A::zero(), |s, &v| s + (v - max).exp()).ln();
            acc + log_sum_exp - row[label]
        });
    aggregate(
        summed / count,
        CROSS_ENTROPY_LOSS_TAG,
        regularization,
        add_summaries,
    )
}

fn mean_squared_error<A: Scalar, D: Dimension>(
    labels: ArrayView<A, D>,
    preds: ArrayView<A, D>,
) -> A {
    // A batch with no contributing elements has a zero mean.
    if labels.is_empty() {
        return A::zero();
    }
    let count = A::value_from(labels.len()).unwrap();
    let squared = (&preds - &labels).mapv_into(|diff| diff * diff);
    squared.sum() / count
}

fn aggregate<A: Scalar>(
    task_loss: A,
    loss_tag: &str,
    regularization: &RegularizationAccumulator<A>,
    add_summaries: bool,
) -> LossOutput<A> {
    let loss_reg = regularization.regularization_loss();
    let loss_total = regularization.total_loss(task_loss);
    let summaries = if add_summaries {
        Some(SummaryBundle::merge([
            ScalarSummary::new(TOTAL_LOSS_TAG, loss_total),
            ScalarSummary::new(REGULARIZATION_LOSS_TAG, loss_reg),
            ScalarSummary::new(loss_tag, task_loss),
        ]))
    } else {
        None
    };
    LossOutput {
        total: loss_total,
        task: task_loss,
        regularization: loss_reg,
        summaries,
    }
}
