//! Cross-crate trait definitions.

pub mod clock;

pub use clock::{Clock, SystemClock};
