//! Layouts shared with the kernel accounting programs.
//!
//! The programs themselves are loaded and pinned by the network daemon;
//! this crate only reads what they leave under the pin directory.

pub mod stats;
pub mod trace;
