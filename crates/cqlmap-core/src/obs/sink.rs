//! Metrics sink boundary.
//!
//! Core logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::statement::StatementKind;

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Upsert,
    Get,
    Delete,
    List,
}

impl ExecKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upsert => "upsert",
            Self::Get => "get",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    Prepare {
        kind: StatementKind,
        entity_path: &'static str,
    },
    ExecStart {
        kind: ExecKind,
        entity_path: &'static str,
    },
    ExecFinish {
        kind: ExecKind,
        entity_path: &'static str,
        rows_loaded: u64,
        ok: bool,
    },
}

///
/// MetricsSink
///
/// Shared across concurrent CRUD calls, hence `Send + Sync`.
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}
