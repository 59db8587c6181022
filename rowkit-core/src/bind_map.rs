use crate::{AsValue, Value, separated_by};
use indexmap::IndexMap;
use std::fmt::{self, Display};

/// Ordered mapping from placeholder name to value.
///
/// Names are stored without the `:` prefix, every accessor accepts both `name` and `:name`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct BindMap {
    values: IndexMap<String, Value>,
}

/// Field name to value mapping handed to insert, update and select.
pub type Fields = BindMap;

fn normalize(name: &str) -> &str {
    name.strip_prefix(':').unwrap_or(name)
}

impl BindMap {
    pub fn new() -> Self {
        Self::default()
    }
    /// Builder style insertion.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }
    /// Insert or replace a value, returns the previous one.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(normalize(name).to_string(), value.into())
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(normalize(name))
    }
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(normalize(name))
    }
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(normalize(name))
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Names without the `:` prefix, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
    /// Value at `index` in insertion order, used for positional placeholders.
    pub fn get_index(&self, index: usize) -> Option<(&str, &Value)> {
        self.values.get_index(index).map(|(k, v)| (k.as_str(), v))
    }
    /// Decode a value through [`AsValue`].
    pub fn get_as<T: AsValue>(&self, name: &str) -> Option<crate::Result<T>> {
        self.get(name).map(|v| T::try_from_value(v.clone()))
    }
    /// Moves all the values of `other` in, returns the names that were already present.
    pub fn merge(&mut self, other: BindMap) -> Vec<String> {
        let mut collisions = Vec::new();
        for (name, value) in other.values {
            if self.values.insert(name.clone(), value).is_some() {
                collisions.push(name);
            }
        }
        collisions
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for BindMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = BindMap::new();
        for (k, v) in iter {
            result.insert(k.as_ref(), v);
        }
        result
    }
}

impl<K: AsRef<str>, V: Into<Value>, const N: usize> From<[(K, V); N]> for BindMap {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for BindMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl Display for BindMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        separated_by(
            &mut out,
            self.iter(),
            |out, (name, value)| {
                out.push(':');
                out.push_str(name);
                out.push_str(" = ");
                out.push_str(&value.to_string());
            },
            ", ",
        );
        f.write_str(&out)
    }
}

/// Shorthand for building a [`BindMap`].
///
/// ```rust
/// let binds = rowkit_core::binds! { "name" => "Ann", "active" => 1 };
/// assert!(binds.contains(":name"));
/// ```
#[macro_export]
macro_rules! binds {
    () => { $crate::BindMap::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut result = $crate::BindMap::new();
        $(result.insert($name, $value);)+
        result
    }};
}
