use crate::{
    CBox, SqliteDriver,
    bind::bind_params,
    extract::{extract_name, extract_value},
    store_error,
};
use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI,
    SQLITE_ROW, sqlite3, sqlite3_busy_timeout, sqlite3_changes64, sqlite3_close,
    sqlite3_column_count,
    sqlite3_db_handle, sqlite3_finalize, sqlite3_last_insert_rowid, sqlite3_open_v2,
    sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt, sqlite3_total_changes64,
};
use quarry_core::{
    AsValue, ColumnInfo, Connection, Driver, Error, ErrorContext, Executor, QueryResult, Result,
    RowLabeled, RowNames, RowsAffected, Statement, as_c_string, truncate_long,
};
use std::{
    ffi::{CStr, c_int},
    marker::PhantomData,
    ptr,
    time::Duration,
};

/// How long a statement waits for a lock held by another connection before
/// failing with `SQLITE_BUSY`.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A connection to one SQLite database. `Send` but not `Sync`: share it
/// across threads behind a lock.
pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

impl SqliteConnection {
    /// Change how long statements wait on locks held by other connections.
    /// A zero duration fails immediately.
    pub fn set_busy_timeout(&mut self, timeout: Duration) -> Result<()> {
        let ms = c_int::try_from(timeout.as_millis()).unwrap_or(c_int::MAX);
        let rc = unsafe { sqlite3_busy_timeout(*self.connection, ms) };
        if rc != SQLITE_OK {
            let error = store_error(*self.connection, rc).context("While setting the busy timeout");
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(())
    }

    fn prepare(&mut self, sql: &str) -> Result<CBox<*mut sqlite3_stmt>> {
        let context = || format!("While preparing the query:\n{}", truncate_long!(sql));
        let c_sql = as_c_string(sql).with_context(context)?;
        let mut statement = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_finalize(p);
        });
        let mut tail = ptr::null();
        let rc = unsafe {
            sqlite3_prepare_v2(
                *self.connection,
                c_sql.as_ptr(),
                -1,
                &mut *statement,
                &mut tail,
            )
        };
        if rc != SQLITE_OK {
            let error = store_error(*self.connection, rc).context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let remaining = if tail.is_null() {
            &[][..]
        } else {
            unsafe { CStr::from_ptr(tail) }.to_bytes()
        };
        if !remaining.iter().all(u8::is_ascii_whitespace) {
            let error =
                Error::msg("Cannot prepare more than one statement at a time").context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        if statement.is_null() {
            let error = Error::msg("The query does not contain any statement").context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(statement)
    }

    fn fetch_column<T: AsValue>(&mut self, sql: &str, table: &str) -> Result<Vec<T>> {
        self.fetch(Statement::new(sql, vec![table.into()]))?
            .map(|row| {
                let row = row?;
                T::try_from_value(row.values.first().cloned().unwrap_or_default())
            })
            .collect()
    }
}

/// Lazily stepped result of a statement. Holds the prepared statement (and
/// a mutable borrow of the connection) until dropped.
pub struct SqliteRows<'c> {
    statement: CBox<*mut sqlite3_stmt>,
    sql: String,
    labels: RowNames,
    changes_before: i64,
    done: bool,
    _connection: PhantomData<&'c mut SqliteConnection>,
}

impl<'c> SqliteRows<'c> {
    fn new(
        statement: CBox<*mut sqlite3_stmt>,
        sql: String,
        connection: &'c mut SqliteConnection,
    ) -> Result<Self> {
        let count = unsafe { sqlite3_column_count(*statement) };
        let labels = (0..count)
            .map(|i| extract_name(*statement, i))
            .collect::<Result<RowNames>>()?;
        Ok(Self {
            changes_before: unsafe { sqlite3_total_changes64(*connection.connection) },
            statement,
            sql,
            labels,
            done: false,
            _connection: PhantomData,
        })
    }

    fn row(&self) -> Result<QueryResult> {
        let values = (0..self.labels.len() as c_int)
            .map(|i| extract_value(*self.statement, i))
            .collect::<Result<_>>()?;
        Ok(RowLabeled::new(self.labels.clone(), values).into())
    }

    fn affected(&self) -> RowsAffected {
        unsafe {
            let db = sqlite3_db_handle(*self.statement);
            if sqlite3_total_changes64(db) == self.changes_before {
                return RowsAffected::default();
            }
            let insert = self
                .sql
                .trim_start()
                .get(..6)
                .is_some_and(|v| v.eq_ignore_ascii_case("INSERT"));
            RowsAffected {
                rows_affected: sqlite3_changes64(db) as u64,
                last_affected_id: insert.then(|| sqlite3_last_insert_rowid(db)),
            }
        }
    }
}

impl Iterator for SqliteRows<'_> {
    type Item = Result<QueryResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // Lock waits happen inside the step, bounded by the busy timeout
        match unsafe { sqlite3_step(*self.statement) } {
            SQLITE_ROW => Some(self.row()),
            SQLITE_DONE => {
                self.done = true;
                if self.labels.is_empty() {
                    Some(Ok(self.affected().into()))
                } else {
                    None
                }
            }
            rc => {
                self.done = true;
                let error = store_error(unsafe { sqlite3_db_handle(*self.statement) }, rc)
                    .context(format!("While executing the query:\n{}", truncate_long!(self.sql)));
                log::error!("{:#}", error);
                Some(Err(error))
            }
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    fn run(
        &mut self,
        statement: Statement,
    ) -> Result<impl Iterator<Item = Result<QueryResult>> + '_> {
        log::debug!("{}", statement);
        let prepared = self.prepare(&statement.sql)?;
        bind_params(*prepared, &statement.params)
            .with_context(|| format!("While binding the query:\n{}", truncate_long!(statement.sql)))?;
        SqliteRows::new(prepared, statement.sql, self)
    }

    fn list_tables(&mut self) -> Result<Vec<String>> {
        self.fetch(Statement::from(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        ))?
        .map(|row| String::try_from_value(row?.values.first().cloned().unwrap_or_default()))
        .collect()
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.fetch(Statement::new(
            r#"SELECT cid, name, type, "notnull", pk FROM pragma_table_info(?)"#,
            vec![table.into()],
        ))?
        .map(|row| {
            let row = row?;
            let column = |name: &str| row.get_column(name).cloned().unwrap_or_default();
            Ok(ColumnInfo {
                id: i64::try_from_value(column("cid"))?,
                name: String::try_from_value(column("name"))?,
                column_type: String::try_from_value(column("type"))?,
                nullable: !bool::try_from_value(column("notnull"))?,
                primary_key: i64::try_from_value(column("pk"))? > 0,
            })
        })
        .collect()
    }

    fn introspect_primary_key(&mut self, table: &str) -> Result<Option<String>> {
        let mut keys = self.fetch_column::<String>(
            "SELECT name FROM pragma_table_info(?) WHERE pk > 0",
            table,
        )?;
        Ok(if keys.len() == 1 { keys.pop() } else { None })
    }
}

impl Connection for SqliteConnection {
    /// Open `sqlite://<path>[?<params>]`, for example `sqlite://:memory:` or
    /// `sqlite://data.sqlite?mode=ro`. Foreign keys are enforced and locks
    /// held by other connections are waited on for [`DEFAULT_BUSY_TIMEOUT`].
    fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", SqliteDriver::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let context = || format!("Error while opening `{}`", url);
        let uri = as_c_string(format!("file:{}", path)).with_context(context)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        let rc = unsafe {
            sqlite3_open_v2(
                uri.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        if rc != SQLITE_OK {
            let error = store_error(*connection, rc).context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut result = Self { connection };
        result.set_busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        result.execute("PRAGMA foreign_keys = ON".into())?;
        log::debug!("Connected to `{}`", url);
        Ok(result)
    }
}

