//! Filter pattern evaluation.
//!
//! The pipeline per record is:
//!
//! 1. **Shape classification**: at every pattern node, a leaf filter is
//!    evaluated in place while an attribute map is recursed into.
//! 2. **Normalization**: the event value at a leaf is unwrapped from its typed
//!    container into a comparable [`Scalar`], `Null`, `Absent` or `Unsupported`.
//! 3. **Rule evaluation**: the leaf's alternatives are tried until one matches.
//!
//! Evaluation is pure and infallible; all grammar errors surface when the
//! pattern is decoded.

pub mod evaluator;
pub mod normalize;
pub mod rules;

pub use evaluator::allow_event;
pub use normalize::{Normalized, Scalar, normalize};
