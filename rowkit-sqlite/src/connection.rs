use crate::{
    CBox, SQLiteDriver,
    bind::bind_parameters,
    error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_changes, sqlite3_close, sqlite3_column_count,
    sqlite3_db_handle, sqlite3_errmsg, sqlite3_finalize, sqlite3_last_insert_rowid,
    sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt,
};
use rowkit_core::{
    Connection, Context, Driver, Error, Executor, Query, QueryResult, Result, Row, RowLabeled,
    RowNames, RowsAffected, StatementKind, stream::Stream, truncate_long,
};
use std::{
    ffi::{CString, c_char, c_int},
    ptr,
};

/// A single SQLite database handle.
///
/// Statements are prepared, bound and stepped on the awaiting task, SQLite calls do not block
/// on I/O beyond the local file.
pub struct SQLiteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

impl SQLiteConnection {
    pub(crate) fn prepare(&self, sql: &str) -> Result<CBox<*mut sqlite3_stmt>> {
        let context = || format!("While preparing the query:\n{}", truncate_long!(sql));
        unsafe {
            let mut statement = CBox::new(ptr::null_mut(), |p| {
                sqlite3_finalize(p);
            });
            let mut tail = ptr::null();
            let rc = sqlite3_prepare_v2(
                *self.connection,
                sql.as_ptr() as *const c_char,
                sql.len() as c_int,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                let error = Error::msg(
                    error_message_from_ptr(&sqlite3_errmsg(*self.connection)).to_string(),
                )
                .context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            if statement.is_null() {
                let error = Error::msg("The query does not contain any statement").context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            let consumed = (tail as usize).saturating_sub(sql.as_ptr() as usize);
            let remaining = sql.get(consumed..).unwrap_or_default();
            if !remaining
                .trim_matches(|c: char| c.is_whitespace() || c == ';')
                .is_empty()
            {
                let error =
                    Error::msg("Cannot run more than one statement at a time").context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            Ok(statement)
        }
    }
}

impl Executor for SQLiteConnection {
    type Driver = SQLiteDriver;

    fn driver(&self) -> &Self::Driver {
        &SQLiteDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let connection = &*self;
        let kind = query.kind();
        try_stream! {
            let statement = connection.prepare(&query.sql)?;
            bind_parameters(*statement, &query.binds)
                .with_context(|| format!("While binding the query:\n{}", query))?;
            let count = unsafe { sqlite3_column_count(*statement) };
            let labels = (0..count)
                .map(|i| extract_name(*statement, i))
                .collect::<Result<RowNames>>()?;
            loop {
                match unsafe { sqlite3_step(*statement) } {
                    SQLITE_BUSY => {
                        continue;
                    }
                    SQLITE_ROW => {
                        let values = (0..count)
                            .map(|i| extract_value(*statement, i))
                            .collect::<Result<Row>>()?;
                        yield QueryResult::Row(RowLabeled::new(labels.clone(), values));
                    }
                    SQLITE_DONE => {
                        if count == 0 {
                            let affected = unsafe {
                                let db = sqlite3_db_handle(*statement);
                                RowsAffected {
                                    rows_affected: if kind.is_modify() {
                                        sqlite3_changes(db).max(0) as u64
                                    } else {
                                        0
                                    },
                                    last_affected_id: (kind == StatementKind::Insert)
                                        .then(|| sqlite3_last_insert_rowid(db)),
                                }
                            };
                            yield QueryResult::Affected(affected);
                        }
                        break;
                    }
                    _ => {
                        let error = unsafe {
                            Error::msg(
                                error_message_from_ptr(&sqlite3_errmsg(*connection.connection))
                                    .to_string(),
                            )
                            .context(format!("While executing the query:\n{}", query))
                        };
                        log::error!("{:#}", error);
                        Err::<(), Error>(error)?;
                    }
                }
            }
        }
    }
}

impl Connection for SQLiteConnection {
    async fn connect(url: &str) -> Result<SQLiteConnection> {
        let prefix = format!("{}://", SQLiteDriver::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            return Err(Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            )));
        };
        let context = || format!("Error while opening the connection URL: `{}`", url);
        let path = CString::new(format!("file:{}", path)).with_context(context)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        unsafe {
            let rc = sqlite3_open_v2(
                path.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let error = Error::msg(
                    error_message_from_ptr(&sqlite3_errmsg(*connection)).to_string(),
                )
                .context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        log::debug!("Connected to {}", url);
        Ok(Self { connection })
    }
}
