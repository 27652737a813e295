//! In-process session for tests and local development.
//!
//! Understands exactly the statement shapes repositories generate and keeps
//! rows in memory with the store's observable semantics: idempotent
//! create-if-missing, upsert-on-insert, partition-key lookups, unreported
//! delete counts and single-page reads.

mod parse;


use crate::{
    codec::ColumnType,
    session::{ExecuteOptions, ResultRows, Row, Session, StoreError},
    value::CqlValue,
};
use async_trait::async_trait;
use parse::{Statement, TableRef};
use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// MemoryPrepared
///

#[derive(Clone, Debug)]
pub struct MemoryPrepared {
    id: u64,
    text: Arc<str>,
    statement: Arc<Statement>,
}

impl MemoryPrepared {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

///
/// MemoryTable
///

#[derive(Debug)]
struct MemoryTable {
    columns: Vec<(String, ColumnType)>,
    partition_key: Vec<usize>,
    rows: Vec<Vec<CqlValue>>,
}

impl MemoryTable {
    fn column_index(&self, name: &str) -> Result<usize, StoreError> {
        self.columns
            .iter()
            .position(|(column, _)| column == name)
            .ok_or_else(|| StoreError::execution(format!("undefined column name {name}")))
    }

    // Map a filter (column names in statement order) to partition-key order.
    fn key_positions(&self, filter: &[String]) -> Result<Vec<usize>, StoreError> {
        let indexes = filter
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sorted = indexes.clone();
        sorted.sort_unstable();
        let mut key = self.partition_key.clone();
        key.sort_unstable();
        if sorted != key {
            return Err(StoreError::execution(
                "filter must restrict exactly the partition key columns",
            ));
        }

        Ok(indexes)
    }

    fn find(&self, key: &[(usize, &CqlValue)]) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| key.iter().all(|(index, value)| row[*index] == **value))
    }
}

///
/// MemoryState
///

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<(String, String), MemoryTable>,
    faults: VecDeque<StoreError>,
    next_id: u64,
}

///
/// MemorySession
///

#[derive(Debug, Default)]
pub struct MemorySession {
    keyspace: Option<String>,
    state: Mutex<MemoryState>,
    prepares: AtomicU64,
    executions: AtomicU64,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the session to a default keyspace.
    #[must_use]
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    /// Fail the next prepare or execute call with `err`.
    pub fn fail_next(&self, err: StoreError) {
        if let Ok(mut state) = self.state.lock() {
            state.faults.push_back(err);
        }
    }

    /// Number of `prepare` calls made against this session.
    #[must_use]
    pub fn prepare_count(&self) -> u64 {
        self.prepares.load(Ordering::Relaxed)
    }

    /// Number of `execute` calls made against this session.
    #[must_use]
    pub fn execute_count(&self) -> u64 {
        self.executions.load(Ordering::Relaxed)
    }

    /// Column layout of a table, if it exists.
    #[must_use]
    pub fn table_columns(&self, keyspace: &str, table: &str) -> Option<Vec<(String, ColumnType)>> {
        let state = self.state.lock().ok()?;

        state
            .tables
            .get(&(keyspace.to_string(), table.to_string()))
            .map(|t| t.columns.clone())
    }

    /// Number of stored rows in a table, if it exists.
    #[must_use]
    pub fn row_count(&self, keyspace: &str, table: &str) -> Option<usize> {
        let state = self.state.lock().ok()?;

        state
            .tables
            .get(&(keyspace.to_string(), table.to_string()))
            .map(|t| t.rows.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::execution("memory session state poisoned"))
    }

    fn resolve(&self, target: &TableRef) -> Result<(String, String), StoreError> {
        let keyspace = target
            .keyspace
            .clone()
            .or_else(|| self.keyspace.clone())
            .ok_or_else(|| StoreError::execution("no keyspace has been specified"))?;

        Ok((keyspace, target.table.clone()))
    }

    // DML statements are validated against the live table when prepared.
    fn check_prepared(state: &MemoryState, key: &(String, String), statement: &Statement) -> Result<(), StoreError> {
        let table = match statement {
            Statement::CreateTable { .. } => return Ok(()),
            _ => state.tables.get(key).ok_or_else(|| unconfigured(key))?,
        };

        match statement {
            Statement::CreateTable { .. } => {}
            Statement::Insert { columns, .. } => {
                for column in columns {
                    table.column_index(column)?;
                }
                for &index in &table.partition_key {
                    if !columns.contains(&table.columns[index].0) {
                        return Err(StoreError::execution(format!(
                            "missing partition key column {}",
                            table.columns[index].0
                        )));
                    }
                }
            }
            Statement::Select {
                columns, filter, ..
            } => {
                for column in columns {
                    table.column_index(column)?;
                }
                if !filter.is_empty() {
                    table.key_positions(filter)?;
                }
            }
            Statement::Delete { filter, .. } => {
                table.key_positions(filter)?;
            }
        }

        Ok(())
    }
}

fn unconfigured(key: &(String, String)) -> StoreError {
    StoreError::execution(format!("unconfigured table {}.{}", key.0, key.1))
}

#[async_trait]
impl Session for MemorySession {
    type Prepared = MemoryPrepared;

    async fn prepare(&self, statement: &str) -> Result<MemoryPrepared, StoreError> {
        self.prepares.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock()?;
        if let Some(err) = state.faults.pop_front() {
            return Err(err);
        }

        let parsed = parse::parse(statement)?;
        let key = self.resolve(parsed.target())?;
        Self::check_prepared(&state, &key, &parsed)?;

        state.next_id += 1;

        Ok(MemoryPrepared {
            id: state.next_id,
            text: Arc::from(statement),
            statement: Arc::new(parsed),
        })
    }

    async fn execute(
        &self,
        prepared: &MemoryPrepared,
        values: &[CqlValue],
        options: ExecuteOptions,
    ) -> Result<ResultRows, StoreError> {
        self.executions.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock()?;
        if let Some(err) = state.faults.pop_front() {
            return Err(err);
        }

        let statement = prepared.statement.as_ref();
        if values.len() != statement.bind_count() {
            return Err(StoreError::execution(format!(
                "expected {} bound values, got {}",
                statement.bind_count(),
                values.len()
            )));
        }

        let key = self.resolve(statement.target())?;
        match statement {
            Statement::CreateTable {
                columns,
                partition_key,
                ..
            } => {
                if !state.tables.contains_key(&key) {
                    let partition_key = partition_key
                        .iter()
                        .map(|name| {
                            columns
                                .iter()
                                .position(|(column, _)| column == name)
                                .ok_or_else(|| {
                                    StoreError::execution(format!("unknown key column {name}"))
                                })
                        })
                        .collect::<Result<Vec<_>, _>>()?;

                    state.tables.insert(
                        key,
                        MemoryTable {
                            columns: columns.clone(),
                            partition_key,
                            rows: Vec::new(),
                        },
                    );
                }

                Ok(ResultRows::empty())
            }

            Statement::Insert { columns, .. } => {
                let table = state.tables.get_mut(&key).ok_or_else(|| unconfigured(&key))?;
                let mut assignments = Vec::with_capacity(columns.len());
                for (column, value) in columns.iter().zip(values) {
                    let index = table.column_index(column)?;
                    let ty = table.columns[index].1;
                    if !ty.accepts(value) {
                        return Err(StoreError::execution(format!(
                            "invalid {} value for column {column} of type {ty}",
                            value.tag()
                        )));
                    }
                    if value.is_null() && table.partition_key.contains(&index) {
                        return Err(StoreError::execution(format!(
                            "invalid null value for partition key column {column}"
                        )));
                    }
                    assignments.push((index, value));
                }

                let key_values: Vec<_> = assignments
                    .iter()
                    .filter(|(index, _)| table.partition_key.contains(index))
                    .map(|(index, value)| (*index, *value))
                    .collect();

                // Inserts overwrite only the columns they name.
                let row = if let Some(pos) = table.find(&key_values) {
                    &mut table.rows[pos]
                } else {
                    table.rows.push(vec![CqlValue::Null; table.columns.len()]);
                    let last = table.rows.len() - 1;
                    &mut table.rows[last]
                };
                for (index, value) in assignments {
                    row[index] = value.clone();
                }

                Ok(ResultRows::empty())
            }

            Statement::Select {
                columns, filter, ..
            } => {
                let table = state.tables.get(&key).ok_or_else(|| unconfigured(&key))?;
                let projection = columns
                    .iter()
                    .map(|column| table.column_index(column))
                    .collect::<Result<Vec<_>, _>>()?;
                let project =
                    |row: &Vec<CqlValue>| Row::new(projection.iter().map(|&i| row[i].clone()).collect());

                let rows = if filter.is_empty() {
                    let limit = options
                        .page_size
                        .map_or(usize::MAX, |size| usize::try_from(size).unwrap_or(usize::MAX));
                    table.rows.iter().take(limit).map(project).collect()
                } else {
                    let positions = table.key_positions(filter)?;
                    let key_values: Vec<_> = positions.into_iter().zip(values).collect();
                    table
                        .find(&key_values)
                        .map(|pos| vec![project(&table.rows[pos])])
                        .unwrap_or_default()
                };

                Ok(ResultRows { rows })
            }

            Statement::Delete { filter, .. } => {
                let table = state.tables.get_mut(&key).ok_or_else(|| unconfigured(&key))?;
                let positions = table.key_positions(filter)?;
                let key_values: Vec<_> = positions.into_iter().zip(values).collect();
                if let Some(pos) = table.find(&key_values) {
                    table.rows.remove(pos);
                }

                Ok(ResultRows::empty())
            }
        }
    }

    fn default_keyspace(&self) -> Option<&str> {
        self.keyspace.as_deref()
    }
}
