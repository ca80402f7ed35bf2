//! Small utilities shared by the road mesh crates: phase timing with collected warnings, counting,
//! and logger setup.

#[macro_use]
extern crate log;

mod collections;
pub mod logger;
mod time;

pub use crate::collections::Counter;
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};
