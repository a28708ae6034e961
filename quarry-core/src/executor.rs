use crate::{
    ColumnInfo, Driver, MappingError, QueryResult, Result, RowLabeled, RowsAffected, SqlWriter,
    Statement, ValueSet, build_delete_rows, build_insert_rows, build_select_rows,
    build_update_rows,
};

/// Return the only item of `rows`, `None` when empty, `MultipleRows` when there is a second one.
pub fn at_most_one<T>(table: &str, mut rows: impl Iterator<Item = Result<T>>) -> Result<Option<T>> {
    let Some(first) = rows.next().transpose()? else {
        return Ok(None);
    };
    if rows.next().transpose()?.is_some() {
        let error = MappingError::MultipleRows {
            table: table.into(),
            count: 2,
        };
        log::error!("{}", error);
        return Err(error.into());
    }
    Ok(Some(first))
}

/// Runs statements against a store.
pub trait Executor: Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Run any statement, producing rows and modify results lazily.
    ///
    /// The returned iterator keeps the statement alive and borrows the
    /// executor until dropped.
    fn run(
        &mut self,
        statement: Statement,
    ) -> Result<impl Iterator<Item = Result<QueryResult>> + '_>;

    /// Execute the statement and return the rows.
    fn fetch(
        &mut self,
        statement: Statement,
    ) -> Result<impl Iterator<Item = Result<RowLabeled>> + '_> {
        Ok(self.run(statement)?.filter_map(|v| match v {
            Ok(QueryResult::Row(v)) => Some(Ok(v)),
            Err(e) => Some(Err(e)),
            _ => None,
        }))
    }

    /// Execute the statement and return the total number of rows affected.
    fn execute(&mut self, statement: Statement) -> Result<RowsAffected> {
        let mut result = RowsAffected::default();
        for v in self.run(statement)? {
            if let QueryResult::Affected(v) = v? {
                result.extend([v]);
            }
        }
        Ok(result)
    }

    /// Names of the user tables, in store order.
    fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Columns of `table` in declaration order, empty when the table does not exist.
    fn list_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// The single column declared primary key of `table`, if any.
    fn introspect_primary_key(&mut self, table: &str) -> Result<Option<String>>;

    /// Insert one row into `table`, `values` are keyed by column.
    fn insert_row(&mut self, table: &str, values: &ValueSet) -> Result<RowsAffected> {
        let writer = self.driver().sql_writer();
        let statement = build_insert_rows(writer.as_dyn(), table, values);
        self.execute(statement)
    }

    /// Rows of `table` matching every column condition, all of them without conditions.
    fn find_rows(&mut self, table: &str, conditions: &ValueSet) -> Result<Vec<RowLabeled>> {
        let writer = self.driver().sql_writer();
        let statement = build_select_rows(writer.as_dyn(), table, conditions);
        self.fetch(statement)?.collect()
    }

    /// The row of `table` matching the conditions, failing if there is more than one.
    fn find_one_row(&mut self, table: &str, conditions: &ValueSet) -> Result<Option<RowLabeled>> {
        let writer = self.driver().sql_writer();
        let statement = build_select_rows(writer.as_dyn(), table, conditions);
        at_most_one(table, self.fetch(statement)?)
    }

    fn update_rows(
        &mut self,
        table: &str,
        values: &ValueSet,
        conditions: &ValueSet,
    ) -> Result<RowsAffected> {
        let writer = self.driver().sql_writer();
        let statement = build_update_rows(writer.as_dyn(), table, values, conditions)?;
        self.execute(statement)
    }

    fn delete_rows(&mut self, table: &str, conditions: &ValueSet) -> Result<RowsAffected> {
        let writer = self.driver().sql_writer();
        let statement = build_delete_rows(writer.as_dyn(), table, conditions)?;
        self.execute(statement)
    }
}
