use crate::{MappingError, Value};
use std::{fmt, str::FromStr};

/// Storage class of a column. Tables are created `STRICT`, so the store
/// enforces the declared class instead of coercing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    Text,
    Integer,
    Real,
    Blob,
    Any,
}

impl StorageType {
    pub const ALL: [StorageType; 5] = [
        StorageType::Text,
        StorageType::Integer,
        StorageType::Real,
        StorageType::Blob,
        StorageType::Any,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageType::Text => "TEXT",
            StorageType::Integer => "INTEGER",
            StorageType::Real => "REAL",
            StorageType::Blob => "BLOB",
            StorageType::Any => "ANY",
        }
    }

    /// Whether a value read from the store can populate a field of this type
    /// without losing information.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (StorageType::Any, _) => true,
            (StorageType::Integer, Value::Integer(..)) => true,
            (StorageType::Real, Value::Real(..)) => true,
            (StorageType::Real, Value::Integer(v)) => *v as f64 as i128 == *v as i128,
            (StorageType::Text, Value::Text(..)) => true,
            (StorageType::Blob, Value::Blob(..)) => true,
            _ => false,
        }
    }
}

impl FromStr for StorageType {
    type Err = MappingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StorageType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                MappingError::schema(format!(
                    "invalid storage type `{}`, must be one of the following: TEXT, INTEGER, REAL, BLOB, ANY",
                    value
                ))
            })
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::StorageType;
    use crate::{MappingError, Value};

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("integer".parse::<StorageType>(), Ok(StorageType::Integer));
        assert_eq!("Text".parse::<StorageType>(), Ok(StorageType::Text));
        assert_eq!(" REAL ".parse::<StorageType>(), Ok(StorageType::Real));
        assert_eq!("blob".parse::<StorageType>(), Ok(StorageType::Blob));
        assert_eq!("aNy".parse::<StorageType>(), Ok(StorageType::Any));
        assert!(matches!(
            "VARCHAR".parse::<StorageType>(),
            Err(MappingError::Schema(..))
        ));
    }

    #[test]
    fn admits_without_narrowing() {
        assert!(StorageType::Integer.admits(&Value::Integer(7)));
        assert!(!StorageType::Integer.admits(&Value::Real(7.5)));
        assert!(StorageType::Real.admits(&Value::Integer(7)));
        assert!(!StorageType::Real.admits(&Value::Integer((1 << 53) + 1)));
        assert!(!StorageType::Real.admits(&Value::Integer(i64::MAX)));
        assert!(!StorageType::Text.admits(&Value::Blob(Box::new([1, 2]))));
        assert!(StorageType::Any.admits(&Value::Blob(Box::new([1, 2]))));
        assert!(StorageType::Blob.admits(&Value::Null));
    }
}
