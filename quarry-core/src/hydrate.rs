use crate::{Entity, EntityDescriptor, ErrorContext, MappingError, Result, RowLabeled};

/// Build an `E` out of a result row.
///
/// Declared fields missing from the row or holding NULL keep their default,
/// columns that no field maps are ignored. A value whose kind the declared
/// storage type does not admit is a `TypeMismatch`.
pub fn hydrate<E: Entity>(descriptor: &EntityDescriptor, row: &RowLabeled) -> Result<E> {
    let mut entity = E::default();
    for field in &descriptor.fields {
        let Some(value) = row.get_column(&field.column_name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if !field.storage_type.admits(value) {
            let error = MappingError::TypeMismatch {
                column: field.column_name.clone(),
                expected: field.storage_type,
                found: value.kind_name(),
            };
            log::error!("{}", error);
            return Err(error.into());
        }
        entity
            .assign(&field.name, value.clone())
            .with_context(|| {
                format!(
                    "While decoding column `{}` of `{}`",
                    field.column_name, descriptor.table_name
                )
            })?;
    }
    Ok(entity)
}
