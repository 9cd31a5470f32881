//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `quota` - AI plan limits, usage windows and the learning period

pub mod foundation;
pub mod quota;
