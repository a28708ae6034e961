/// A column as reported by store introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Ordinal position, starting from 0.
    pub id: i64,
    pub name: String,
    /// Declared type as written in the table definition, possibly empty.
    pub column_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}
