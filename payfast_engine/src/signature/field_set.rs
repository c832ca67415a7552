use std::fmt::Debug;

use url::form_urlencoded;

/// An ordered mapping of field name to field value.
///
/// Insertion order is preserved and is what gets forwarded to the gateway in postbacks. Signatures never depend on it,
/// since they always use the canonical field order. Re-inserting an existing name replaces the value in place.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<(String, String)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` body. If a name is repeated, the last value wins.
    pub fn from_form_body(body: &str) -> Self {
        form_urlencoded::parse(body.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    /// Sets `name` to `value`, returning the previous value if there was one.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.fields.push((name, value));
                None
            },
        }
    }

    /// Builder-style [`Self::insert`]
    pub fn with<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to `value` only if `name` is not present yet.
    pub fn set_default<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        if !self.contains(&name) {
            self.fields.push((name, value.into()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = Self::new();
        iter.into_iter().for_each(|(k, v)| {
            result.insert(k, v);
        });
        result
    }
}

impl Debug for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.fields.iter().map(|(k, v)| (k, v))).finish()
    }
}
