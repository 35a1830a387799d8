use conv::ValueFrom;
use ndarray::NdFloat;
use ndarray_rand::rand_distr::uniform::SampleUniform;

/// Element type accepted by every loss routine in this crate.
pub trait Scalar: NdFloat + SampleUniform + ValueFrom<usize> {}

impl Scalar for f32 {}
impl Scalar for f64 {}
