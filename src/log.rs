//! Logging macros used across the kernel.
//!
//! With the `tracing` feature these are the `tracing` macros themselves, so
//! a subscriber sees trace edits, union walks and via stamping. Without it
//! they expand to an empty block and the arguments are never evaluated.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
