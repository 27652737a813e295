//! Typed CRUD surface over one entity's table.

mod key;


pub use key::Key;

use crate::{
    codec::{self, CodecError},
    config::RepositoryConfig,
    error::Error,
    obs::{
        global_counters,
        sink::{ExecKind, MetricsEvent, MetricsSink},
    },
    schema::EntityDescriptor,
    session::{ExecuteOptions, ResultRows, Row, Session},
    statement::{self, StatementKind, StatementSet, StatementText},
    traits::EntityKind,
    value::CqlValue,
};
use std::{marker::PhantomData, sync::Arc};
use tokio_util::sync::CancellationToken;

///
/// Repository
///
/// CRUD over the table of entity `E`, executed through session `S`.
///
/// Lifecycle: construction derives and validates the descriptor (fail fast);
/// `initialize` prepares the statement set; CRUD calls before that fail with
/// `NotInitialized`. After initialization the repository is read-only state
/// and may be shared across concurrent calls.
///

pub struct Repository<E, S: Session> {
    session: Arc<S>,
    descriptor: EntityDescriptor,
    statements: Option<StatementSet<S::Prepared>>,
    metrics: Option<&'static dyn MetricsSink>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Repository<E, S>
where
    E: EntityKind,
    S: Session,
{
    /// Build a repository, resolving the keyspace from the session when the
    /// entity declares none.
    pub fn new(session: Arc<S>) -> Result<Self, Error> {
        let descriptor = EntityDescriptor::derive_from(E::MODEL, session.default_keyspace())?;

        Ok(Self::from_parts(session, descriptor))
    }

    /// Build a repository with explicit settings. A configured keyspace takes
    /// precedence over the session's bound keyspace.
    pub fn with_config(session: Arc<S>, config: &RepositoryConfig) -> Result<Self, Error> {
        config.validate()?;

        let default_keyspace = config.keyspace.as_deref().or(session.default_keyspace());
        let descriptor = EntityDescriptor::derive_from(E::MODEL, default_keyspace)?;
        let repository = Self::from_parts(session, descriptor);

        Ok(if config.metrics {
            repository.metrics_sink(global_counters())
        } else {
            repository
        })
    }

    fn from_parts(session: Arc<S>, descriptor: EntityDescriptor) -> Self {
        Self {
            session,
            descriptor,
            statements: None,
            metrics: None,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<S> {
        &self.session
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.statements.is_some()
    }

    /// Statement text this repository prepares; available before initialization.
    pub fn statement_text(&self) -> Result<StatementText, Error> {
        StatementText::build(&self.descriptor)
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Ensure the table exists and prepare every statement.
    ///
    /// Repeatable; each call replaces the cached set. A failed call leaves
    /// any previously prepared set in place.
    pub async fn initialize(&mut self) -> Result<(), Error> {
        let set = statement::initialize(self.session.as_ref(), &self.descriptor, self.metrics).await?;
        self.statements = Some(set);

        Ok(())
    }

    // ---------------------------------------------------------------------
    // CRUD
    // ---------------------------------------------------------------------

    /// Insert or overwrite the row for `entity`'s partition key.
    pub async fn upsert(&self, entity: &E) -> Result<(), Error> {
        self.upsert_with_cancel(entity, &CancellationToken::new()).await
    }

    pub async fn upsert_with_cancel(
        &self,
        entity: &E,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        let statements = self.ready()?;
        let values = self.bind_entity(entity)?;

        self.execute(
            statements,
            ExecKind::Upsert,
            StatementKind::Insert,
            &values,
            ExecuteOptions::default(),
            cancel,
        )
        .await?;

        Ok(())
    }

    /// Load the entity stored under `key`, or `None` if no row matches.
    pub async fn get_by_id<'k>(&self, key: impl Into<Key<'k, E>>) -> Result<Option<E>, Error> {
        self.get_by_id_with_cancel(key, &CancellationToken::new()).await
    }

    pub async fn get_by_id_with_cancel<'k>(
        &self,
        key: impl Into<Key<'k, E>>,
        cancel: &CancellationToken,
    ) -> Result<Option<E>, Error> {
        let statements = self.ready()?;
        let values = key.into().bind(&self.descriptor)?;

        let rows = self
            .execute(
                statements,
                ExecKind::Get,
                StatementKind::SelectByKey,
                &values,
                ExecuteOptions::default(),
                cancel,
            )
            .await?;

        // a partition-key lookup yields at most one row; extras are ignored
        rows.into_iter()
            .next()
            .map(|row| self.map_row(row))
            .transpose()
    }

    /// Delete the row stored under `key`.
    ///
    /// The store does not report affected rows, so success does not mean a
    /// row existed; use `get_by_id` when existence matters.
    pub async fn delete<'k>(&self, key: impl Into<Key<'k, E>>) -> Result<(), Error> {
        self.delete_with_cancel(key, &CancellationToken::new()).await
    }

    pub async fn delete_with_cancel<'k>(
        &self,
        key: impl Into<Key<'k, E>>,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        let statements = self.ready()?;
        let values = key.into().bind(&self.descriptor)?;

        self.execute(
            statements,
            ExecKind::Delete,
            StatementKind::DeleteByKey,
            &values,
            ExecuteOptions::default(),
            cancel,
        )
        .await?;

        Ok(())
    }

    /// Load up to `limit` entities in store order (all rows when `None`).
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<E>, Error> {
        self.list_with_cancel(limit, &CancellationToken::new()).await
    }

    pub async fn list_with_cancel(
        &self,
        limit: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Vec<E>, Error> {
        let statements = self.ready()?;
        if limit == Some(0) {
            check_cancelled(cancel)?;
            return Ok(Vec::new());
        }

        let options = ExecuteOptions { page_size: limit };
        let rows = self
            .execute(
                statements,
                ExecKind::List,
                StatementKind::SelectAll,
                &[],
                options,
                cancel,
            )
            .await?;

        let mut rows = rows.rows;
        if let Some(limit) = limit.and_then(|limit| usize::try_from(limit).ok()) {
            rows.truncate(limit);
        }

        rows.into_iter().map(|row| self.map_row(row)).collect()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn ready(&self) -> Result<&StatementSet<S::Prepared>, Error> {
        self.statements.as_ref().ok_or(Error::NotInitialized {
            entity: self.descriptor.entity(),
        })
    }

    // Shared execution wrapper keeps cancellation and metrics uniform.
    async fn execute(
        &self,
        statements: &StatementSet<S::Prepared>,
        exec: ExecKind,
        kind: StatementKind,
        values: &[CqlValue],
        options: ExecuteOptions,
        cancel: &CancellationToken,
    ) -> Result<ResultRows, Error> {
        check_cancelled(cancel)?;

        let entity_path = self.descriptor.entity();
        self.record(MetricsEvent::ExecStart {
            kind: exec,
            entity_path,
        });

        let result = self
            .session
            .execute(statements.get(kind), values, options)
            .await;

        let rows_loaded = result.as_ref().map_or(0, |rows| rows.len() as u64);
        self.record(MetricsEvent::ExecFinish {
            kind: exec,
            entity_path,
            rows_loaded,
            ok: result.is_ok(),
        });

        let rows = result?;
        tracing::trace!(entity = entity_path, op = exec.label(), rows = rows_loaded, "executed");

        Ok(rows)
    }

    fn record(&self, event: MetricsEvent) {
        if let Some(sink) = self.metrics {
            sink.record(event);
        }
    }

    fn bind_entity(&self, entity: &E) -> Result<Vec<CqlValue>, Error> {
        let columns = self.descriptor.columns();
        let values = entity.to_field_values();
        if values.len() != columns.len() {
            return Err(CodecError::ValueCount {
                expected: columns.len(),
                found: values.len(),
            }
            .into());
        }

        let bound = values
            .iter()
            .zip(columns)
            .map(|(value, column)| {
                codec::bind_value(value, column.ty).map_err(|err| err.in_column(&column.column))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bound)
    }

    fn map_row(&self, row: Row) -> Result<E, Error> {
        let columns = self.descriptor.columns();
        if row.values.len() != columns.len() {
            return Err(CodecError::ValueCount {
                expected: columns.len(),
                found: row.values.len(),
            }
            .into());
        }

        let values = row
            .values
            .into_iter()
            .zip(columns)
            .map(|(value, column)| {
                codec::from_wire(value, column.ty).map_err(|err| err.in_column(&column.column))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(E::from_field_values(values)?)
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), Error> {
    if cancel.is_cancelled() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}
