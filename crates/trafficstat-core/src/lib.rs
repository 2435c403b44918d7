//! # trafficstat-core
//!
//! Fallback counter source for kernels without BPF traffic accounting.
//!
//! This crate parses the two text tables exported by the `xt_qtaguid`
//! netfilter module:
//! - **Interface table** (`iface_stat_fmt`): one row per interface.
//! - **Uid table** (`stats`): one row per (interface, tag, uid, counter set).
//!
//! Rows that do not match the expected layout are skipped rather than
//! treated as errors. Only failing to open, read, or close a table is an
//! error.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod qtaguid;
