//! # trafficstat-ebpf
//!
//! Kernel-side traffic accounting for the trafficstat service.
//!
//! Provides:
//! - **Counter sources**: the [`CounterSource`](source::CounterSource) seam
//!   and the pinned BPF map backend that answers it.
//! - **Map layouts**: value types shared with the accounting programs.
//! - **Packet tracing**: the one-shot trace initialization trigger.
//!
//! The `ebpf` feature flag must be enabled and the host must have the
//! accounting maps pinned for the BPF backend to answer queries. Without
//! it every lookup reports the counters as unavailable.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod bpf;
pub mod programs;
pub mod source;
pub mod tracer;
