use crate::{EntityDescriptor, Executor, Result};

/// Name of the column identifying rows of `table`: the declared key, else the
/// key found by introspection, else the implicit `rowid`.
pub fn primary_key<Exec: Executor>(
    executor: &mut Exec,
    table: &str,
    descriptor: Option<&EntityDescriptor>,
) -> Result<String> {
    if let Some(field) = descriptor.and_then(EntityDescriptor::primary_key) {
        return Ok(field.column_name.clone());
    }
    Ok(executor
        .introspect_primary_key(table)?
        .unwrap_or_else(|| "rowid".into()))
}
