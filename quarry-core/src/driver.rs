use crate::{Connection, Result, SqlWriter};

/// A store backend: its connection type and its SQL dialect.
pub trait Driver: Sized {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn get_instance() -> Self;
    fn sql_writer(&self) -> Self::SqlWriter;

    fn connect(&self, url: &str) -> Result<Self::Connection> {
        Self::Connection::connect(url)
    }
}
