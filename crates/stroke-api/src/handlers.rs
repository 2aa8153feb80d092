//! Request handlers.

pub mod analyze;
pub mod estimate;
pub mod health;

pub use analyze::*;
pub use estimate::*;
pub use health::*;
