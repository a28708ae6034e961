use crate::StorageType;
use std::fmt::{self, Display};

/// Dynamically typed cell: every bound parameter and every row value.
///
/// The variants mirror the storage classes of the store, `Null` included, so
/// a NULL marker is never confused with an absent entry.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Box<[u8]>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Storage class of the value, `None` for NULL.
    pub fn storage_type(&self) -> Option<StorageType> {
        match self {
            Value::Null => None,
            Value::Integer(..) => Some(StorageType::Integer),
            Value::Real(..) => Some(StorageType::Real),
            Value::Text(..) => Some(StorageType::Text),
            Value::Blob(..) => Some(StorageType::Blob),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.storage_type().map_or("NULL", |v| v.as_str())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{:?}", v),
            Value::Text(v) => write!(f, "{:?}", v),
            Value::Blob(v) => {
                f.write_str("X'")?;
                for b in v.iter() {
                    write!(f, "{:02X}", b)?;
                }
                f.write_str("'")
            }
        }
    }
}
