//! Traffic counter queries for the trafficstat service.
//!
//! [`query::StatQuery`] asks the primary counter source first and falls
//! back to the legacy kernel tables. [`service::NetworkStatsService`] is
//! the five-operation boundary handed to callers.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod query;
pub mod service;
