pub mod constants;
pub mod progress;
pub mod statistics;

pub use constants::*;
pub use progress::ProgressReporter;
pub use statistics::{linear_fit, mean, sample_std, MeanAccumulator};
