use crate::{
    BindMap, Connection, Driver, ErrorHandler, Executor, Failed, Failure, Fields, Model, Options,
    Outcome, Query, Registry, Result, RowLabeled, RowsAffected, SqlWriter, StatementKind,
    TableDef, UsageError, Value, stream::TryStreamExt,
};
use std::{future::Future, panic::Location, sync::Arc};

/// The call surface: statement shorthands over a single owned connection.
///
/// Every operation catches its failure, logs it, reports it to the error handler, stores it
/// as [`Database::last_error`] and returns `Err(Failed)`. Each call starts by clearing the
/// last error and the last query.
///
/// ```ignore
/// let mut db = Database::<SQLiteConnection>::connect("sqlite://:memory:").await?;
/// let id = db.insert("users", &binds! { "name" => "Ann", "active" => 1 }).await?;
/// let row = db.find("users", id).await?;
/// ```
pub struct Database<C: Connection> {
    connection: C,
    registry: Arc<Registry>,
    options: Options,
    handler: Option<Box<dyn ErrorHandler>>,
    last_error: Option<Failure>,
    last_query: Option<Query>,
}

impl<C: Connection> Database<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            registry: Default::default(),
            options: Default::default(),
            handler: None,
            last_error: None,
            last_query: None,
        }
    }

    /// Connect to `url`, connection errors are returned immediately.
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(C::connect(url).await?))
    }

    /// Share table definitions with other databases.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn set_error_handler(&mut self, handler: impl ErrorHandler + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Failure of the most recent call, if it failed.
    pub fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    /// Statement sent by the most recent call.
    pub fn last_query(&self) -> Option<&Query> {
        self.last_query.as_ref()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Introspect `table` unless already registered.
    #[track_caller]
    pub fn register(&mut self, table: &str) -> impl Future<Output = Result<Arc<TableDef>, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let result = self.table_def(table).await;
            self.finish(result, &BindMap::new(), location)
        }
    }

    /// Insert a row built from `fields`, returns the new row identity (0 when none is reported).
    ///
    /// When `table` is a full statement it is executed with `fields` as its binds.
    #[track_caller]
    pub fn insert(&mut self, table: &str, fields: &Fields) -> impl Future<Output = Result<i64, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let result = self.insert_statement(table, fields).await;
            self.finish(result, fields, location)
        }
    }

    /// Update `table` with `fields`, filtered by the optional `condition` using `binds`.
    ///
    /// Returns the number of affected rows.
    #[track_caller]
    pub fn update(
        &mut self,
        table: &str,
        fields: &Fields,
        condition: Option<&str>,
        binds: &BindMap,
    ) -> impl Future<Output = Result<u64, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let result = self.update_statement(table, fields, condition, binds).await;
            let mut input = fields.clone();
            input.merge(binds.clone());
            self.finish(result, &input, location)
        }
    }

    /// Delete the rows of `table` matching `condition`, returns the number of affected rows.
    #[track_caller]
    pub fn delete(
        &mut self,
        table: &str,
        condition: &str,
        binds: &BindMap,
    ) -> impl Future<Output = Result<u64, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let result = self.delete_statement(table, condition, binds).await;
            self.finish(result, binds, location)
        }
    }

    /// Execute any statement, the outcome depends on its kind.
    #[track_caller]
    pub fn run(&mut self, sql: &str, binds: &BindMap) -> impl Future<Output = Result<Outcome, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let query = Query::new(sql).with_binds(binds.clone());
            let result = match query.kind() {
                StatementKind::Insert => self
                    .execute_query(query)
                    .await
                    .map(|v| Outcome::Inserted(v.last_affected_id.unwrap_or_default())),
                StatementKind::Update | StatementKind::Delete => self
                    .execute_query(query)
                    .await
                    .map(|v| Outcome::Affected(v.rows_affected)),
                StatementKind::Other => self.fetch_rows(query).await.map(Outcome::Rows),
            };
            self.finish(result, binds, location)
        }
    }

    /// Execute a query and return all its rows.
    #[track_caller]
    pub fn query(
        &mut self,
        sql: &str,
        binds: &BindMap,
    ) -> impl Future<Output = Result<Vec<RowLabeled>, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let query = Query::new(sql).with_binds(binds.clone());
            let result = self.fetch_rows(query).await;
            self.finish(result, binds, location)
        }
    }

    /// Execute a query and return its first row.
    #[track_caller]
    pub fn query_row(
        &mut self,
        sql: &str,
        binds: &BindMap,
    ) -> impl Future<Output = Result<Option<RowLabeled>, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let query = Query::new(sql).with_binds(binds.clone());
            let result = self.fetch_row(query).await;
            self.finish(result, binds, location)
        }
    }

    /// Rows of `table` equal to every value of `filter`, coerced to the field types.
    #[track_caller]
    pub fn select(
        &mut self,
        table: &str,
        filter: &Fields,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<RowLabeled>, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let result = self.select_rows(table, filter, limit).await;
            self.finish(result, filter, location)
        }
    }

    /// Row of `table` whose primary key is `id`, coerced to the field types.
    #[track_caller]
    pub fn find(
        &mut self,
        table: &str,
        id: impl Into<Value>,
    ) -> impl Future<Output = Result<Option<RowLabeled>, Failed>> {
        let location = Location::caller();
        let id = id.into();
        async move {
            self.begin();
            let result = self.find_row(table, id.clone()).await;
            self.finish(result, &BindMap::new().with("id", id), location)
        }
    }

    /// Record of type `M` whose primary key is `id`.
    #[track_caller]
    pub fn load<M: Model>(
        &mut self,
        id: impl Into<Value>,
    ) -> impl Future<Output = Result<Option<M>, Failed>> {
        let location = Location::caller();
        let id = id.into();
        async move {
            self.begin();
            let result = match self.find_row(M::table(), id.clone()).await {
                Ok(Some(row)) => M::from_row(&row).map(Some).map_err(|e| {
                    e.context(format!("While reading a record of table `{}`", M::table()))
                }),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            };
            self.finish(result, &BindMap::new().with("id", id), location)
        }
    }

    /// Insert `model` when its primary key is unset (storing the new identity), update it otherwise.
    #[track_caller]
    pub fn save<M: Model>(&mut self, model: &mut M) -> impl Future<Output = Result<(), Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let fields = model.fields();
            let result = self.save_record(model, &fields).await;
            self.finish(result, &fields, location)
        }
    }

    /// Delete the row of `model`, returns the number of affected rows.
    #[track_caller]
    pub fn remove<M: Model>(&mut self, model: &M) -> impl Future<Output = Result<u64, Failed>> {
        let location = Location::caller();
        async move {
            self.begin();
            let result = match model.primary_key().filter(|v| !v.is_null()) {
                Some(id) => self.delete_by_key(M::table(), id).await,
                None => Err(UsageError::new(format!(
                    "Cannot delete a record of table `{}` without a primary key value",
                    M::table()
                ))
                .into()),
            };
            self.finish(result, &model.fields(), location)
        }
    }

    fn begin(&mut self) {
        self.last_error = None;
        self.last_query = None;
    }

    fn finish<T>(
        &mut self,
        result: Result<T>,
        input: &BindMap,
        location: &'static Location<'static>,
    ) -> Result<T, Failed> {
        let error = match result {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        let (sql, binds) = match &self.last_query {
            Some(query) => (Some(query.sql.clone()), query.binds.clone()),
            None => (None, input.clone()),
        };
        let failure = Failure::new(error, sql, binds, location);
        log::error!("{}", failure);
        if let Some(handler) = &self.handler {
            handler.handle(&failure);
        }
        self.last_error = Some(failure);
        Err(Failed)
    }

    fn build(
        &self,
        write: impl FnOnce(&dyn SqlWriter, &mut String, &mut BindMap) -> Result<()>,
    ) -> Result<Query> {
        let writer = self.connection.driver().sql_writer();
        let mut query = Query::default();
        write(writer.as_dyn(), &mut query.sql, &mut query.binds)?;
        Ok(query)
    }

    async fn table_def(&mut self, table: &str) -> Result<Arc<TableDef>> {
        if let Some(found) = self.registry.get(table) {
            return Ok(found);
        }
        self.last_query = Some(self.connection.driver().columns_query(table));
        let result = self.registry.register(&mut self.connection, table).await?;
        self.last_query = None;
        Ok(result)
    }

    async fn execute_query(&mut self, query: Query) -> Result<RowsAffected> {
        log::debug!("Executing: {}", query);
        self.last_query = Some(query.clone());
        self.connection.execute(query).await
    }

    async fn fetch_rows(&mut self, query: Query) -> Result<Vec<RowLabeled>> {
        log::debug!("Fetching: {}", query);
        self.last_query = Some(query.clone());
        self.connection.fetch(query).try_collect().await
    }

    async fn fetch_row(&mut self, query: Query) -> Result<Option<RowLabeled>> {
        log::debug!("Fetching one: {}", query);
        self.last_query = Some(query.clone());
        self.connection.fetch_one(query).await
    }

    async fn insert_statement(&mut self, table: &str, fields: &Fields) -> Result<i64> {
        let query = if StatementKind::is_statement(table) {
            Query::new(table).with_binds(fields.clone())
        } else {
            let def = self.table_def(table).await?;
            let resolved = def.resolve(fields, self.options.unknown_fields)?;
            self.build(|writer, sql, binds| writer.write_insert(sql, binds, &def.name, &resolved))?
        };
        let result = self.execute_query(query).await?;
        Ok(result.last_affected_id.unwrap_or_default())
    }

    async fn update_statement(
        &mut self,
        table: &str,
        fields: &Fields,
        condition: Option<&str>,
        binds: &BindMap,
    ) -> Result<u64> {
        let mut query = if StatementKind::is_statement(table) {
            if condition.is_some_and(|v| !v.trim().is_empty()) {
                log::warn!("The condition is ignored when updating through a full statement");
            }
            Query::new(table).with_binds(fields.clone())
        } else {
            let def = self.table_def(table).await?;
            let resolved = def.resolve(fields, self.options.unknown_fields)?;
            self.build(|writer, sql, generated| {
                writer.write_update(sql, generated, &def.name, &resolved, condition)
            })?
        };
        reject_collisions(query.binds.merge(binds.clone()))?;
        Ok(self.execute_query(query).await?.rows_affected)
    }

    async fn delete_statement(&mut self, table: &str, condition: &str, binds: &BindMap) -> Result<u64> {
        let query = if StatementKind::is_statement(table) {
            if !condition.trim().is_empty() {
                log::warn!("The condition is ignored when deleting through a full statement");
            }
            Query::new(table)
        } else {
            self.build(|writer, sql, _| writer.write_delete(sql, table, condition))?
        };
        let query = query.with_binds(binds.clone());
        Ok(self.execute_query(query).await?.rows_affected)
    }

    async fn select_rows(
        &mut self,
        table: &str,
        filter: &Fields,
        limit: Option<u32>,
    ) -> Result<Vec<RowLabeled>> {
        let def = self.table_def(table).await?;
        let resolved = def.resolve(filter, self.options.unknown_fields)?;
        let query = self.build(|writer, sql, binds| {
            writer.write_select(sql, binds, &def.name, &resolved, limit)
        })?;
        self.fetch_rows(query)
            .await?
            .into_iter()
            .map(|row| def.coerce_row(row))
            .collect()
    }

    async fn find_row(&mut self, table: &str, id: Value) -> Result<Option<RowLabeled>> {
        let def = self.table_def(table).await?;
        let query = {
            let key = primary_key(&def)?;
            self.build(|writer, sql, binds| writer.write_select(sql, binds, &def.name, &[(key, &id)], Some(1)))?
        };
        self.fetch_row(query)
            .await?
            .map(|row| def.coerce_row(row))
            .transpose()
    }

    async fn delete_by_key(&mut self, table: &str, id: Value) -> Result<u64> {
        let def = self.table_def(table).await?;
        let condition = self.key_condition(&def)?;
        let query = self.build(|writer, sql, binds| {
            binds.insert("primary_key", id);
            writer.write_delete(sql, &def.name, &condition)
        })?;
        Ok(self.execute_query(query).await?.rows_affected)
    }

    async fn save_record<M: Model>(&mut self, model: &mut M, fields: &Fields) -> Result<()> {
        let def = self.table_def(M::table()).await?;
        let key = primary_key(&def)?.name.clone();
        match model.primary_key().filter(|v| !v.is_null()) {
            None => {
                let mut fields = fields.clone();
                fields.remove(&key);
                let id = self.insert_statement(&def.name, &fields).await?;
                model.set_primary_key(id);
            }
            Some(id) => {
                let mut fields = fields.clone();
                fields.remove(&key);
                let condition = self.key_condition(&def)?;
                let binds = BindMap::new().with("primary_key", id);
                self.update_statement(&def.name, &fields, Some(&condition), &binds)
                    .await?;
            }
        }
        Ok(())
    }

    /// `"<primary key>" = :primary_key`
    fn key_condition(&self, def: &TableDef) -> Result<String> {
        let key = primary_key(def)?;
        let writer = self.connection.driver().sql_writer();
        let mut condition = String::new();
        writer.write_identifier_quoted(&mut condition, &key.name);
        condition.push_str(" = ");
        writer.write_placeholder(&mut condition, "primary_key");
        Ok(condition)
    }
}

fn primary_key(def: &TableDef) -> Result<&crate::FieldDef> {
    def.primary_key_def().ok_or_else(|| {
        UsageError::new(format!("Table `{}` has no primary key", def.name)).into()
    })
}

fn reject_collisions(collisions: Vec<String>) -> Result<()> {
    if collisions.is_empty() {
        return Ok(());
    }
    Err(UsageError::new(format!(
        "Binds {} collide with the generated update parameters",
        collisions
            .iter()
            .map(|v| format!("`:{}`", v))
            .collect::<Vec<_>>()
            .join(", ")
    ))
    .into())
}
