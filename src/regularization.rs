use ndarray::{ArrayView, Dimension};

use crate::shared::Scalar;

/// Weight penalty applied to a layer's parameters at construction time.
pub enum Regularizer<A> {
    L1(A),
    L2(A),
}

impl<A: Scalar> Regularizer<A> {
    pub fn penalty<D: Dimension>(&self, weights: ArrayView<A, D>) -> A {
        match self {
            &Self::L1(scale) => scale * weights.fold(A::zero(), |acc, &w| acc + w.abs()),
            &Self::L2(scale) => {
                let half = A::one() / (A::one() + A::one());
                half * scale * weights.fold(A::zero(), |acc, &w| acc + w * w)
            }
        }
    }
}

/// Running total of weight penalties, populated while the model graph is
/// built and read back by the loss routines.
pub struct RegularizationAccumulator<A> {
    penalties: Vec<A>,
}

impl<A: Scalar> RegularizationAccumulator<A> {
    pub fn new() -> Self {
        Self {
            penalties: Vec::new(),
        }
    }

    pub fn add(&mut self, penalty: A) {
        self.penalties.push(penalty);
    }

    /// The accumulated penalty alone. Zero when nothing has been added.
    pub fn regularization_loss(&self) -> A {
        self.penalties
            .iter()
            .fold(A::zero(), |acc, &penalty| acc + penalty)
    }

    /// Task loss plus the accumulated penalty.
    pub fn total_loss(&self, task_loss: A) -> A {
        task_loss + self.regularization_loss()
    }

    pub fn is_empty(&self) -> bool {
        self.penalties.is_empty()
    }
}

impl<A: Scalar> Default for RegularizationAccumulator<A> {
    fn default() -> Self {
        Self::new()
    }
}
