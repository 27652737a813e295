//! Statement builder and prepared-statement cache.
//!
//! Text generation is pure and driven only by the descriptor; preparation
//! happens once per repository initialization and the handles are reused
//! for every CRUD call.


use crate::{
    codec,
    error::Error,
    ident::{qualified, quote},
    obs::sink::{MetricsEvent, MetricsSink},
    schema::EntityDescriptor,
    session::{ExecuteOptions, Session},
};
use std::fmt;

///
/// StatementKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatementKind {
    CreateTable,
    Insert,
    SelectByKey,
    DeleteByKey,
    SelectAll,
}

impl StatementKind {
    pub const ALL: [Self; 5] = [
        Self::CreateTable,
        Self::Insert,
        Self::SelectByKey,
        Self::DeleteByKey,
        Self::SelectAll,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateTable => "create_table",
            Self::Insert => "insert",
            Self::SelectByKey => "select_by_key",
            Self::DeleteByKey => "delete_by_key",
            Self::SelectAll => "select_all",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// StatementText
///
/// Generated statement text for one entity, every identifier quoted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatementText {
    pub create_table: String,
    pub insert: String,
    pub select_by_key: String,
    pub delete_by_key: String,
    pub select_all: String,
}

impl StatementText {
    pub fn build(descriptor: &EntityDescriptor) -> Result<Self, Error> {
        let target = qualified(descriptor.keyspace(), descriptor.table());

        let mut definitions = Vec::with_capacity(descriptor.columns().len());
        for column in descriptor.columns() {
            let ty = codec::column_type(column.ty.kind)?;
            definitions.push(format!("{} {ty}", quote(&column.column)));
        }

        let key_columns: Vec<_> = descriptor
            .partition_keys()
            .map(|column| quote(&column.column))
            .collect();
        let column_list = descriptor
            .columns()
            .iter()
            .map(|column| quote(&column.column))
            .collect::<Vec<_>>()
            .join(", ");
        let markers = vec!["?"; descriptor.columns().len()].join(", ");
        let key_filter = key_columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(" AND ");

        Ok(Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {target} ({}, PRIMARY KEY (({})))",
                definitions.join(", "),
                key_columns.join(", "),
            ),
            insert: format!("INSERT INTO {target} ({column_list}) VALUES ({markers})"),
            select_by_key: format!("SELECT {column_list} FROM {target} WHERE {key_filter}"),
            delete_by_key: format!("DELETE FROM {target} WHERE {key_filter}"),
            select_all: format!("SELECT {column_list} FROM {target}"),
        })
    }

    #[must_use]
    pub fn get(&self, kind: StatementKind) -> &str {
        match kind {
            StatementKind::CreateTable => &self.create_table,
            StatementKind::Insert => &self.insert,
            StatementKind::SelectByKey => &self.select_by_key,
            StatementKind::DeleteByKey => &self.delete_by_key,
            StatementKind::SelectAll => &self.select_all,
        }
    }
}

///
/// StatementSet
///
/// Prepared handles retained after initialization; read-only thereafter.
///

#[derive(Clone, Debug)]
pub struct StatementSet<P> {
    text: StatementText,
    create_table: P,
    insert: P,
    select_by_key: P,
    delete_by_key: P,
    select_all: P,
}

impl<P> StatementSet<P> {
    #[must_use]
    pub const fn text(&self) -> &StatementText {
        &self.text
    }

    #[must_use]
    pub const fn get(&self, kind: StatementKind) -> &P {
        match kind {
            StatementKind::CreateTable => &self.create_table,
            StatementKind::Insert => &self.insert,
            StatementKind::SelectByKey => &self.select_by_key,
            StatementKind::DeleteByKey => &self.delete_by_key,
            StatementKind::SelectAll => &self.select_all,
        }
    }
}

/// Build, prepare and run the table DDL, then prepare the CRUD statements.
///
/// Safe to repeat: the DDL is create-if-missing, so a second call rebuilds
/// an equivalent set without touching the table.
pub async fn initialize<S: Session>(
    session: &S,
    descriptor: &EntityDescriptor,
    metrics: Option<&dyn MetricsSink>,
) -> Result<StatementSet<S::Prepared>, Error> {
    let text = StatementText::build(descriptor)?;
    let entity_path = descriptor.entity();

    let create_table = prepare(session, &text, StatementKind::CreateTable, entity_path, metrics).await?;
    session
        .execute(&create_table, &[], ExecuteOptions::default())
        .await?;
    tracing::debug!(
        entity = entity_path,
        keyspace = descriptor.keyspace(),
        table = descriptor.table(),
        "table ensured"
    );

    let insert = prepare(session, &text, StatementKind::Insert, entity_path, metrics).await?;
    let select_by_key = prepare(session, &text, StatementKind::SelectByKey, entity_path, metrics).await?;
    let delete_by_key = prepare(session, &text, StatementKind::DeleteByKey, entity_path, metrics).await?;
    let select_all = prepare(session, &text, StatementKind::SelectAll, entity_path, metrics).await?;

    Ok(StatementSet {
        text,
        create_table,
        insert,
        select_by_key,
        delete_by_key,
        select_all,
    })
}

async fn prepare<S: Session>(
    session: &S,
    text: &StatementText,
    kind: StatementKind,
    entity_path: &'static str,
    metrics: Option<&dyn MetricsSink>,
) -> Result<S::Prepared, Error> {
    let statement = text.get(kind);
    let prepared = session.prepare(statement).await?;

    tracing::trace!(entity = entity_path, %kind, statement, "prepared");
    if let Some(sink) = metrics {
        sink.record(MetricsEvent::Prepare { kind, entity_path });
    }

    Ok(prepared)
}
