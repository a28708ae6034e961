use quarry_core::SqlWriter;

/// SQLite dialect: tables are created `STRICT`.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn strict_tables(&self) -> bool {
        true
    }
}
