use crate::{
    Driver, Executor, FieldDef, Result, RowLabeled, TableDef, UsageError, stream::TryStreamExt,
};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// Table definitions known to one or more [`crate::Database`]s.
///
/// Each table is introspected once, the first stored definition wins and is never replaced.
#[derive(Default, Debug)]
pub struct Registry {
    tables: RwLock<HashMap<String, Arc<TableDef>>>,
}

impl Registry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, table: &str) -> Option<Arc<TableDef>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .cloned()
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(table)
    }

    /// Stores `table` unless a definition with the same name exists, returns the stored one.
    pub fn insert(&self, table: TableDef) -> Arc<TableDef> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables
            .entry(table.name.clone())
            .or_insert_with(|| Arc::new(table))
            .clone()
    }

    /// Names of the registered tables, sorted.
    pub fn tables(&self) -> Vec<String> {
        let mut result: Vec<_> = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        result.sort();
        result
    }

    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the definition of `table`, introspecting it through `executor` the first time.
    pub async fn register<E: Executor>(&self, executor: &mut E, table: &str) -> Result<Arc<TableDef>> {
        if let Some(found) = self.get(table) {
            return Ok(found);
        }
        let definition = describe_table(executor, table).await?;
        log::debug!(
            "Registered table `{}` with {} fields",
            definition.name,
            definition.fields.len()
        );
        Ok(self.insert(definition))
    }
}

/// Runs the driver introspection query for `table` and maps every column to a [`FieldDef`].
pub async fn describe_table<E: Executor>(executor: &mut E, table: &str) -> Result<TableDef> {
    let query = executor.driver().columns_query(table);
    let rows: Vec<RowLabeled> = executor
        .fetch(query)
        .try_collect()
        .await
        .map_err(|e| e.context(format!("While introspecting table `{}`", table)))?;
    let driver = executor.driver();
    let fields = rows
        .iter()
        .map(|row| {
            let native: String = row.get("type")?;
            Ok(FieldDef {
                name: row.get("name")?,
                ty: driver.field_type(&native),
                native,
                primary_key: row.get("pk")?,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| e.context(format!("While reading the columns of table `{}`", table)))?;
    if fields.is_empty() {
        return Err(UsageError::new(format!(
            "Table `{}` does not exist or has no columns",
            table
        ))
        .into());
    }
    Ok(TableDef::new(table, fields))
}
