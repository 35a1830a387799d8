pub mod loss;
pub mod regularization;
pub mod shared;
pub mod summary;
