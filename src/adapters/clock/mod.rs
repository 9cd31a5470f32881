//! Clock adapters.
//!
//! - `SystemClock` - wall-clock time for production
//! - `FixedClock` - settable time for tests and scripted local runs

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;
