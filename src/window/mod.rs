//! Reply time window module.
//!
//! Tracks the window during which replies are enabled or suppressed,
//! and the policy deciding which of the two it is.

mod policy;
mod state;

pub use policy::WindowMode;
pub use state::{TimeWindow, WindowError};
