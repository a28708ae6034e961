use crate::{
    ColumnValue, EntityDescriptor, Error, MappingError, Projection, Result, SqlWriter, Statement,
    ValueSet,
};

/// Map the (already projected) fields of `values` to their columns.
fn to_columns<'a>(
    descriptor: &'a EntityDescriptor,
    values: &'a ValueSet,
) -> Result<Vec<ColumnValue<'a>>> {
    values
        .iter()
        .map(|(field, value)| descriptor.column_of(field).map(|column| (column, value)))
        .collect()
}

/// Entries of `values` passing `projection`, which may only name declared fields.
fn projected(
    descriptor: &EntityDescriptor,
    values: &ValueSet,
    projection: Option<&Projection>,
) -> Result<ValueSet> {
    if let Some(name) = projection
        .into_iter()
        .flat_map(Projection::iter)
        .find(|v| descriptor.field(v).is_none())
    {
        return Err(fail(MappingError::schema(format!(
            "projection names `{}` which `{}` does not declare",
            name, descriptor.table_name
        ))));
    }
    Ok(values.clone().project(projection))
}

fn fail(error: MappingError) -> Error {
    log::error!("{}", error);
    error.into()
}

/// Column keyed insert.
pub fn build_insert_rows(writer: &dyn SqlWriter, table: &str, values: &ValueSet) -> Statement {
    let mut statement = Statement::default();
    writer.write_insert(
        &mut statement.sql,
        &mut statement.params,
        table,
        &values.iter().collect::<Vec<_>>(),
    );
    statement
}

/// Column keyed select, unconditional when `conditions` is empty.
pub fn build_select_rows(writer: &dyn SqlWriter, table: &str, conditions: &ValueSet) -> Statement {
    let mut statement = Statement::default();
    writer.write_select(
        &mut statement.sql,
        &mut statement.params,
        table,
        &conditions.iter().collect::<Vec<_>>(),
    );
    statement
}

/// Column keyed update, refuses empty conditions and empty assignments.
pub fn build_update_rows(
    writer: &dyn SqlWriter,
    table: &str,
    values: &ValueSet,
    conditions: &ValueSet,
) -> Result<Statement> {
    update_columns(
        writer,
        table,
        &values.iter().collect::<Vec<_>>(),
        &conditions.iter().collect::<Vec<_>>(),
    )
}

/// Column keyed delete, refuses empty conditions.
pub fn build_delete_rows(
    writer: &dyn SqlWriter,
    table: &str,
    conditions: &ValueSet,
) -> Result<Statement> {
    delete_columns(writer, table, &conditions.iter().collect::<Vec<_>>())
}

fn update_columns(
    writer: &dyn SqlWriter,
    table: &str,
    assignments: &[ColumnValue],
    conditions: &[ColumnValue],
) -> Result<Statement> {
    if conditions.is_empty() {
        return Err(fail(MappingError::EmptyCondition {
            table: table.into(),
        }));
    }
    if assignments.is_empty() {
        return Err(fail(MappingError::EmptyAssignment {
            table: table.into(),
        }));
    }
    let mut statement = Statement::default();
    writer.write_update(
        &mut statement.sql,
        &mut statement.params,
        table,
        assignments,
        conditions,
    );
    Ok(statement)
}

fn delete_columns(
    writer: &dyn SqlWriter,
    table: &str,
    conditions: &[ColumnValue],
) -> Result<Statement> {
    if conditions.is_empty() {
        return Err(fail(MappingError::EmptyCondition {
            table: table.into(),
        }));
    }
    let mut statement = Statement::default();
    writer.write_delete(&mut statement.sql, &mut statement.params, table, conditions);
    Ok(statement)
}

/// `INSERT INTO` every field of `values` passing `projection`, NULLs bound as NULL.
pub fn build_insert(
    writer: &dyn SqlWriter,
    descriptor: &EntityDescriptor,
    values: &ValueSet,
    projection: Option<&Projection>,
) -> Result<Statement> {
    let values = projected(descriptor, values, projection)?;
    let columns = to_columns(descriptor, &values)?;
    let mut statement = Statement::default();
    writer.write_insert(
        &mut statement.sql,
        &mut statement.params,
        &descriptor.table_name,
        &columns,
    );
    Ok(statement)
}

/// `SELECT *` constrained by every field of `conditions` passing `projection`.
pub fn build_select(
    writer: &dyn SqlWriter,
    descriptor: &EntityDescriptor,
    conditions: &ValueSet,
    projection: Option<&Projection>,
) -> Result<Statement> {
    let conditions = projected(descriptor, conditions, projection)?;
    let columns = to_columns(descriptor, &conditions)?;
    let mut statement = Statement::default();
    writer.write_select(
        &mut statement.sql,
        &mut statement.params,
        &descriptor.table_name,
        &columns,
    );
    Ok(statement)
}

pub fn build_update(
    writer: &dyn SqlWriter,
    descriptor: &EntityDescriptor,
    values: &ValueSet,
    update_projection: Option<&Projection>,
    conditions: &ValueSet,
    condition_projection: Option<&Projection>,
) -> Result<Statement> {
    let values = projected(descriptor, values, update_projection)?;
    let conditions = projected(descriptor, conditions, condition_projection)?;
    update_columns(
        writer,
        &descriptor.table_name,
        &to_columns(descriptor, &values)?,
        &to_columns(descriptor, &conditions)?,
    )
}

pub fn build_delete(
    writer: &dyn SqlWriter,
    descriptor: &EntityDescriptor,
    conditions: &ValueSet,
    projection: Option<&Projection>,
) -> Result<Statement> {
    let conditions = projected(descriptor, conditions, projection)?;
    delete_columns(
        writer,
        &descriptor.table_name,
        &to_columns(descriptor, &conditions)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDef, GenericSqlWriter, Value};

    fn product() -> EntityDescriptor {
        EntityDescriptor::build(
            "product",
            &[
                FieldDef::new("id", "INTEGER").primary_key().auto_increment(),
                FieldDef::new("name", "TEXT").not_null(),
                FieldDef::new("price", "REAL").column("unit_price").not_null(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn projected_insert() {
        let statement = build_insert(
            &GenericSqlWriter,
            &product(),
            &ValueSet::new()
                .with("id", Value::Null)
                .with("name", "widget")
                .with("price", 9.99),
            Some(&Projection::of(["name", "price"])),
        )
        .unwrap();
        assert_eq!(statement.sql, "INSERT INTO product(name, unit_price) VALUES(?, ?)");
        assert_eq!(statement.params, [Value::from("widget"), Value::Real(9.99)]);
    }

    #[test]
    fn undeclared_field_is_a_schema_error() {
        let error = build_select(
            &GenericSqlWriter,
            &product(),
            &ValueSet::new().with("nmae", "widget"),
            None,
        )
        .unwrap_err();
        assert!(matches!(MappingError::of(&error), Some(MappingError::Schema(..))));
    }

    #[test]
    fn undeclared_projection_name_is_a_schema_error() {
        let conditions = ValueSet::new().with("name", "widget");
        let typo = Projection::of(["nmae"]);
        let errors = [
            build_select(&GenericSqlWriter, &product(), &conditions, Some(&typo)).unwrap_err(),
            build_insert(&GenericSqlWriter, &product(), &conditions, Some(&typo)).unwrap_err(),
            build_delete(&GenericSqlWriter, &product(), &conditions, Some(&typo)).unwrap_err(),
            build_update(
                &GenericSqlWriter,
                &product(),
                &conditions,
                Some(&Projection::of(["name"])),
                &ValueSet::new().with("id", 1),
                Some(&Projection::of(["id", "prize"])),
            )
            .unwrap_err(),
        ];
        for error in &errors {
            assert!(
                matches!(MappingError::of(error), Some(MappingError::Schema(message)) if message.contains('`')),
                "expected a schema error, got {:#}",
                error
            );
        }
    }

    #[test]
    fn projection_can_empty_the_condition() {
        let error = build_delete(
            &GenericSqlWriter,
            &product(),
            &ValueSet::new().with("name", "widget"),
            Some(&Projection::of(["id"])),
        )
        .unwrap_err();
        assert_eq!(
            MappingError::of(&error),
            Some(&MappingError::EmptyCondition {
                table: "product".into()
            })
        );
    }

    #[test]
    fn update_requires_assignment() {
        let error = build_update(
            &GenericSqlWriter,
            &product(),
            &ValueSet::new(),
            None,
            &ValueSet::new().with("id", 1),
            None,
        )
        .unwrap_err();
        assert_eq!(
            MappingError::of(&error),
            Some(&MappingError::EmptyAssignment {
                table: "product".into()
            })
        );
    }

    #[test]
    fn update_binds_set_then_where() {
        let statement = build_update(
            &GenericSqlWriter,
            &product(),
            &ValueSet::new().with("price", 5.0).with("name", Value::Null),
            None,
            &ValueSet::new().with("id", 3).with("name", Value::Null),
            None,
        )
        .unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE product SET unit_price = ?, name = ? WHERE id = ? AND name IS NULL"
        );
        assert_eq!(
            statement.params,
            [Value::Real(5.0), Value::Null, Value::Integer(3)]
        );
    }
}
