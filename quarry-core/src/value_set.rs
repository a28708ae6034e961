use crate::Value;
use std::{borrow::Cow, collections::BTreeSet};

/// Ordered `(name, value)` pairs, used both as conditions and as assignments.
///
/// An entry holding [`Value::Null`] is an explicit NULL, a name that is not in
/// the set is absent. The two produce different SQL.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ValueSet {
    entries: Vec<(Cow<'static, str>, Value)>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style [`ValueSet::push`].
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<Value>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entries holding a value.
    pub fn non_null(mut self) -> Self {
        self.entries.retain(|(_, v)| !v.is_null());
        self
    }

    /// Keep only the entries whose name passes the projection, all when `None`.
    pub fn project(mut self, projection: Option<&Projection>) -> Self {
        if let Some(projection) = projection {
            self.entries.retain(|(k, _)| projection.contains(k));
        }
        self
    }
}

impl<K: Into<Cow<'static, str>>, V: Into<Value>> FromIterator<(K, V)> for ValueSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ValueSet {
    type Item = (Cow<'static, str>, Value);
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Allow-list of field names taking part in a statement.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    names: BTreeSet<Cow<'static, str>>,
}

impl Projection {
    pub fn of<N: Into<Cow<'static, str>>>(names: impl IntoIterator<Item = N>) -> Self {
        names.into_iter().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }
}

impl<N: Into<Cow<'static, str>>> FromIterator<N> for Projection {
    fn from_iter<T: IntoIterator<Item = N>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Projection, ValueSet};
    use crate::Value;

    #[test]
    fn keeps_order_and_nulls() {
        let values = ValueSet::new()
            .with("b", 1)
            .with("a", Value::Null)
            .with("c", "x");
        assert_eq!(values.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(values.get("a"), Some(&Value::Null));
        assert_eq!(values.get("z"), None);
        let values = values.non_null();
        assert_eq!(values.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn projection_filters() {
        let projection = Projection::of(["c", "a"]);
        let values: ValueSet = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let values = values.project(Some(&projection));
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            [("a", &Value::Integer(1)), ("c", &Value::Integer(3))]
        );
        assert_eq!(values.clone().project(None), values);
    }
}
