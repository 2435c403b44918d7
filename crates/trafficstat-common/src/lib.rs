//! # trafficstat-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire trafficstat workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the counter primitives that the parsers,
//! the BPF backend, and the query layer all exchange.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
