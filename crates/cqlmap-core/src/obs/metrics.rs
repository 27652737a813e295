use crate::obs::sink::{ExecKind, MetricsEvent, MetricsSink};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

static GLOBAL: EventCounters = EventCounters::new();

/// Process-wide counters, attached by `RepositoryConfig { metrics: true }`.
#[must_use]
pub fn global_counters() -> &'static EventCounters {
    &GLOBAL
}

///
/// EventReport
/// Point-in-time snapshot of counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: OpCounters,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// OpCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct OpCounters {
    pub prepares: u64,
    pub upsert_calls: u64,
    pub get_calls: u64,
    pub delete_calls: u64,
    pub list_calls: u64,
    pub rows_loaded: u64,
    pub failures: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub upsert_calls: u64,
    pub get_calls: u64,
    pub delete_calls: u64,
    pub list_calls: u64,
    pub rows_loaded: u64,
    pub failures: u64,
}

impl EntityCounters {
    const fn calls_mut(&mut self, kind: ExecKind) -> &mut u64 {
        match kind {
            ExecKind::Upsert => &mut self.upsert_calls,
            ExecKind::Get => &mut self.get_calls,
            ExecKind::Delete => &mut self.delete_calls,
            ExecKind::List => &mut self.list_calls,
        }
    }
}

///
/// EventCounters
/// Ephemeral, in-memory counters fed by metrics events.
///

#[derive(Debug)]
pub struct EventCounters {
    prepares: AtomicU64,
    upsert_calls: AtomicU64,
    get_calls: AtomicU64,
    delete_calls: AtomicU64,
    list_calls: AtomicU64,
    rows_loaded: AtomicU64,
    failures: AtomicU64,
    entities: Mutex<BTreeMap<&'static str, EntityCounters>>,
}

impl Default for EventCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCounters {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prepares: AtomicU64::new(0),
            upsert_calls: AtomicU64::new(0),
            get_calls: AtomicU64::new(0),
            delete_calls: AtomicU64::new(0),
            list_calls: AtomicU64::new(0),
            rows_loaded: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            entities: Mutex::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn report(&self) -> EventReport {
        let entities = self
            .entities
            .lock()
            .map(|entities| {
                entities
                    .iter()
                    .map(|(path, counters)| ((*path).to_string(), counters.clone()))
                    .collect()
            })
            .unwrap_or_default();

        EventReport {
            ops: OpCounters {
                prepares: self.prepares.load(Ordering::Relaxed),
                upsert_calls: self.upsert_calls.load(Ordering::Relaxed),
                get_calls: self.get_calls.load(Ordering::Relaxed),
                delete_calls: self.delete_calls.load(Ordering::Relaxed),
                list_calls: self.list_calls.load(Ordering::Relaxed),
                rows_loaded: self.rows_loaded.load(Ordering::Relaxed),
                failures: self.failures.load(Ordering::Relaxed),
            },
            entities,
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.prepares,
            &self.upsert_calls,
            &self.get_calls,
            &self.delete_calls,
            &self.list_calls,
            &self.rows_loaded,
            &self.failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        if let Ok(mut entities) = self.entities.lock() {
            entities.clear();
        }
    }

    const fn calls(&self, kind: ExecKind) -> &AtomicU64 {
        match kind {
            ExecKind::Upsert => &self.upsert_calls,
            ExecKind::Get => &self.get_calls,
            ExecKind::Delete => &self.delete_calls,
            ExecKind::List => &self.list_calls,
        }
    }

    fn with_entity(&self, entity_path: &'static str, f: impl FnOnce(&mut EntityCounters)) {
        if let Ok(mut entities) = self.entities.lock() {
            f(entities.entry(entity_path).or_default());
        }
    }
}

impl MetricsSink for EventCounters {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Prepare { .. } => {
                self.prepares.fetch_add(1, Ordering::Relaxed);
            }

            MetricsEvent::ExecStart { kind, entity_path } => {
                self.calls(kind).fetch_add(1, Ordering::Relaxed);
                self.with_entity(entity_path, |entry| {
                    let calls = entry.calls_mut(kind);
                    *calls = calls.saturating_add(1);
                });
            }

            MetricsEvent::ExecFinish {
                entity_path,
                rows_loaded,
                ok,
                ..
            } => {
                self.rows_loaded.fetch_add(rows_loaded, Ordering::Relaxed);
                if !ok {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                }
                self.with_entity(entity_path, |entry| {
                    entry.rows_loaded = entry.rows_loaded.saturating_add(rows_loaded);
                    if !ok {
                        entry.failures = entry.failures.saturating_add(1);
                    }
                });
            }
        }
    }
}

///
/// TESTS
///
