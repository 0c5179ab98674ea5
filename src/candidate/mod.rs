//! Corner candidate ranking and pruning utilities.
//!
//! Includes deterministic best-N retention and spatial non-maximum
//! suppression for detected corners.

pub(crate) mod nms;
pub(crate) mod topk;

pub use topk::Corner;
