use crate::{MappingError, Result, StorageType};
use std::collections::HashSet;

/// Declared metadata of one mapped field, as written by the derive macro or
/// by hand. Validated into a [`FieldDescriptor`] by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub column_name: &'static str,
    pub storage_type: &'static str,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub references: Option<(&'static str, &'static str)>,
}

impl FieldDef {
    /// Nullable, non unique, non key field whose column is named like the field.
    pub const fn new(name: &'static str, storage_type: &'static str) -> Self {
        Self {
            name,
            column_name: name,
            storage_type,
            nullable: true,
            unique: false,
            primary_key: false,
            auto_increment: false,
            references: None,
        }
    }
    pub const fn column(mut self, column_name: &'static str) -> Self {
        self.column_name = column_name;
        self
    }
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some((table, column));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Validated field metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub column_name: String,
    pub storage_type: StorageType,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub references: Option<ForeignKey>,
}

/// Validated, immutable metadata of an entity: table name and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub table_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Validate `defs` into a descriptor, without going through the cache.
    pub fn build(table_name: &str, defs: &[FieldDef]) -> Result<Self> {
        let mut names = HashSet::new();
        let mut columns = HashSet::new();
        let mut primary_key: Option<&str> = None;
        let mut fields = Vec::with_capacity(defs.len());
        for def in defs {
            let storage_type: StorageType = def.storage_type.parse().map_err(|e| {
                let message = match e {
                    MappingError::Schema(message) => message,
                    other => other.to_string(),
                };
                MappingError::schema(format!("{}.{}: {}", table_name, def.name, message))
            })?;
            if !names.insert(def.name) {
                return Err(MappingError::schema(format!(
                    "{}: field `{}` is declared more than once",
                    table_name, def.name
                ))
                .into());
            }
            if !columns.insert(def.column_name) {
                return Err(MappingError::schema(format!(
                    "{}: column `{}` is mapped by more than one field",
                    table_name, def.column_name
                ))
                .into());
            }
            if def.primary_key {
                if let Some(previous) = primary_key {
                    return Err(MappingError::schema(format!(
                        "{}: both `{}` and `{}` are declared primary key, at most one is allowed",
                        table_name, previous, def.name
                    ))
                    .into());
                }
                primary_key = Some(def.name);
            }
            if def.auto_increment && !(def.primary_key && storage_type == StorageType::Integer) {
                return Err(MappingError::schema(format!(
                    "{}.{}: auto_increment requires an INTEGER primary key",
                    table_name, def.name
                ))
                .into());
            }
            fields.push(FieldDescriptor {
                name: def.name.into(),
                column_name: def.column_name.into(),
                storage_type,
                nullable: def.nullable,
                unique: def.unique,
                primary_key: def.primary_key,
                auto_increment: def.auto_increment,
                references: def.references.map(|(table, column)| ForeignKey {
                    table: table.into(),
                    column: column.into(),
                }),
            });
        }
        Ok(Self {
            table_name: table_name.into(),
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|v| v.name == name)
    }

    pub fn primary_key(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|v| v.primary_key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column mapped by `field`, a `Schema` error when the entity does not declare it.
    pub fn column_of(&self, field: &str) -> Result<&str> {
        self.field(field)
            .map(|v| v.column_name.as_str())
            .ok_or_else(|| {
                MappingError::schema(format!(
                    "`{}` has no field named `{}`",
                    self.table_name, field
                ))
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityDescriptor, FieldDef};
    use crate::{MappingError, StorageType};

    fn schema_error(defs: &[FieldDef]) -> String {
        let error = EntityDescriptor::build("t", defs).expect_err("must fail");
        match MappingError::of(&error) {
            Some(MappingError::Schema(message)) => message.clone(),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn builds_in_declaration_order() {
        let descriptor = EntityDescriptor::build(
            "product",
            &[
                FieldDef::new("id", "integer").primary_key().auto_increment(),
                FieldDef::new("name", "TEXT").not_null().unique(),
                FieldDef::new("owner", "INTEGER")
                    .column("owner_id")
                    .references("user", "id"),
            ],
        )
        .expect("valid descriptor");
        assert_eq!(descriptor.table_name, "product");
        assert_eq!(
            descriptor.fields.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            ["id", "name", "owner"]
        );
        assert_eq!(descriptor.primary_key().map(|v| v.name.as_str()), Some("id"));
        assert_eq!(descriptor.fields[0].storage_type, StorageType::Integer);
        assert!(!descriptor.fields[1].nullable);
        assert_eq!(descriptor.column_of("owner").unwrap(), "owner_id");
        assert!(descriptor.column_of("missing").is_err());
        let fk = descriptor.fields[2].references.as_ref().unwrap();
        assert_eq!((fk.table.as_str(), fk.column.as_str()), ("user", "id"));
    }

    #[test]
    fn rejects_invalid_metadata() {
        assert!(
            schema_error(&[
                FieldDef::new("a", "INTEGER").primary_key(),
                FieldDef::new("b", "INTEGER").primary_key(),
            ])
            .contains("at most one")
        );
        let message = schema_error(&[FieldDef::new("a", "VARCHAR")]);
        assert!(message.starts_with("t.a: invalid storage type `VARCHAR`"));
        let error = EntityDescriptor::build("t", &[FieldDef::new("a", "VARCHAR")]).unwrap_err();
        assert_eq!(error.to_string().matches("schema error").count(), 1);
        assert!(schema_error(&[FieldDef::new("a", "TEXT").primary_key().auto_increment()])
            .contains("auto_increment"));
        assert!(schema_error(&[FieldDef::new("a", "INTEGER").auto_increment()])
            .contains("auto_increment"));
        assert!(
            schema_error(&[FieldDef::new("a", "TEXT"), FieldDef::new("a", "TEXT")])
                .contains("more than once")
        );
        assert!(
            schema_error(&[
                FieldDef::new("a", "TEXT"),
                FieldDef::new("b", "TEXT").column("a"),
            ])
            .contains("more than one field")
        );
    }

    #[test]
    fn empty_entity_is_valid() {
        let descriptor = EntityDescriptor::build("nothing", &[]).unwrap();
        assert!(descriptor.is_empty());
        assert!(descriptor.primary_key().is_none());
    }
}
