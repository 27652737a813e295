//! Observability: operation counters and the sink boundary.
//!
//! Repositories never write output themselves. Instrumentation flows through
//! `MetricsEvent` into a caller-attached `MetricsSink`.

pub mod metrics;
pub mod sink;

// re-exports
pub use metrics::{EntityCounters, EventCounters, EventReport, OpCounters, global_counters};
pub use sink::{ExecKind, MetricsEvent, MetricsSink};
