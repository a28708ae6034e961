use crate::{
    Driver, EntityDescriptor, Executor, FieldDef, Projection, Result, RowLabeled, RowsAffected,
    SqlWriter, Statement, Value, ValueSet, at_most_one, build_delete, build_insert, build_select,
    build_update, hydrate, primary_key, resolve,
};

/// A record type mapped to one table.
///
/// Usually implemented with `#[derive(Entity)]`, hand written implementations
/// only need the four required methods.
///
/// # Which fields take part in a statement
/// When a statement is built out of a record and no projection is given,
/// conditions and update assignments use the fields holding a value, while
/// insert uses every field (NULL bound as NULL). With a projection every
/// projected field takes part, NULL included. Explicit [`ValueSet`]s
/// (`*_by` methods) always use every entry they contain.
pub trait Entity: Default + Sized + 'static {
    fn table_name() -> &'static str;
    fn field_defs() -> &'static [FieldDef];
    /// One entry per mapped field, in declaration order.
    fn values(&self) -> ValueSet;
    /// Set `field` from a value read from the store.
    fn assign(&mut self, field: &str, value: Value) -> Result<()>;

    fn descriptor() -> Result<&'static EntityDescriptor> {
        resolve::<Self>()
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        hydrate(Self::descriptor()?, row)
    }

    /// Values of the record taking part in a predicate or an assignment.
    fn participating_values(&self, projection: Option<&Projection>) -> ValueSet {
        match projection {
            Some(..) => self.values(),
            None => self.values().non_null(),
        }
    }

    /// Create the table, dropping it first when `drop_if_exists`. An entity
    /// without fields has no table and nothing is executed.
    fn create_table<Exec: Executor>(executor: &mut Exec, drop_if_exists: bool) -> Result<()> {
        let descriptor = Self::descriptor()?;
        if descriptor.is_empty() {
            log::debug!("`{}` maps no field, no table created", descriptor.table_name);
            return Ok(());
        }
        let writer = executor.driver().sql_writer();
        if drop_if_exists {
            let mut sql = String::new();
            writer.write_drop_table(&mut sql, &descriptor.table_name, true);
            executor.execute(sql.into())?;
        }
        let mut sql = String::with_capacity(256);
        writer.write_create_table(&mut sql, descriptor);
        executor.execute(sql.into())?;
        log::info!("Created table `{}`", descriptor.table_name);
        Ok(())
    }

    fn drop_table<Exec: Executor>(executor: &mut Exec) -> Result<()> {
        let descriptor = Self::descriptor()?;
        let mut sql = String::new();
        executor
            .driver()
            .sql_writer()
            .write_drop_table(&mut sql, &descriptor.table_name, true);
        executor.execute(sql.into())?;
        log::info!("Dropped table `{}`", descriptor.table_name);
        Ok(())
    }

    fn insert<Exec: Executor>(
        &self,
        executor: &mut Exec,
        projection: Option<&Projection>,
    ) -> Result<RowsAffected> {
        let statement = build_insert(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            &self.values(),
            projection,
        )?;
        executor.execute(statement)
    }

    /// Records matching the non null fields of `template` (or the projected
    /// ones), every record without a template.
    fn find<Exec: Executor>(
        executor: &mut Exec,
        template: Option<&Self>,
        projection: Option<&Projection>,
    ) -> Result<Vec<Self>> {
        let statement = Self::select_statement(executor, template, projection)?;
        executor
            .fetch(statement)?
            .map(|row| Self::from_row(&row?))
            .collect()
    }

    fn find_first<Exec: Executor>(
        executor: &mut Exec,
        template: Option<&Self>,
        projection: Option<&Projection>,
    ) -> Result<Option<Self>> {
        let statement = Self::select_statement(executor, template, projection)?;
        executor
            .fetch(statement)?
            .next()
            .map(|row| Self::from_row(&row?))
            .transpose()
    }

    /// The single matching record, `MultipleRows` when more than one matches.
    fn find_one<Exec: Executor>(
        executor: &mut Exec,
        template: Option<&Self>,
        projection: Option<&Projection>,
    ) -> Result<Option<Self>> {
        let statement = Self::select_statement(executor, template, projection)?;
        at_most_one(Self::table_name(), executor.fetch(statement)?)?
            .map(|row| Self::from_row(&row))
            .transpose()
    }

    fn find_by<Exec: Executor>(executor: &mut Exec, conditions: &ValueSet) -> Result<Vec<Self>> {
        let statement = build_select(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            conditions,
            None,
        )?;
        executor
            .fetch(statement)?
            .map(|row| Self::from_row(&row?))
            .collect()
    }

    #[doc(hidden)]
    fn select_statement<Exec: Executor>(
        executor: &Exec,
        template: Option<&Self>,
        projection: Option<&Projection>,
    ) -> Result<Statement> {
        let conditions = template
            .map(|v| v.participating_values(projection))
            .unwrap_or_default();
        build_select(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            &conditions,
            projection,
        )
    }

    /// Assign the fields of `values` to the rows matching `conditions`.
    fn update<Exec: Executor>(
        executor: &mut Exec,
        values: &Self,
        update_projection: Option<&Projection>,
        conditions: &Self,
        condition_projection: Option<&Projection>,
    ) -> Result<RowsAffected> {
        let statement = build_update(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            &values.participating_values(update_projection),
            update_projection,
            &conditions.participating_values(condition_projection),
            condition_projection,
        )?;
        executor.execute(statement)
    }

    fn update_by<Exec: Executor>(
        executor: &mut Exec,
        values: &ValueSet,
        conditions: &ValueSet,
    ) -> Result<RowsAffected> {
        let statement = build_update(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            values,
            None,
            conditions,
            None,
        )?;
        executor.execute(statement)
    }

    /// Delete the rows matching this record.
    fn delete<Exec: Executor>(
        &self,
        executor: &mut Exec,
        projection: Option<&Projection>,
    ) -> Result<RowsAffected> {
        let statement = build_delete(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            &self.participating_values(projection),
            projection,
        )?;
        executor.execute(statement)
    }

    fn delete_by<Exec: Executor>(executor: &mut Exec, conditions: &ValueSet) -> Result<RowsAffected> {
        let statement = build_delete(
            executor.driver().sql_writer().as_dyn(),
            Self::descriptor()?,
            conditions,
            None,
        )?;
        executor.execute(statement)
    }

    /// Column identifying the rows of this entity's table.
    fn primary_key_column<Exec: Executor>(executor: &mut Exec) -> Result<String> {
        let descriptor = Self::descriptor()?;
        primary_key(executor, &descriptor.table_name, Some(descriptor))
    }
}
