//! Packet tracing program.
//!
//! Defines the names the packet trace program publishes under the pin
//! directory and the trace data source it feeds.

/// Ring buffer the packet trace program writes captured headers into.
pub const PACKET_TRACE_RINGBUF: &str = "map_netd_packet_trace_ringbuf";

/// Trace data source name registered by the trace handler.
pub const PACKET_TRACE_DATA_SOURCE: &str = "android.network_packets";
