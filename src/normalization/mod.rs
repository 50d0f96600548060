//! Ct normalization: housekeeping reference and replicate averaging

mod average;
mod housekeeping;

pub use average::attach_average_ct;
pub use housekeeping::{attach_housekeeping_ct, housekeeping_means};
