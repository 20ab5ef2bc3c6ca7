//! Variable Store
//!
//! Flat string-to-string variable table, seeded from the host environment at
//! startup. Insertion order is preserved so diagnostics and exported
//! environments stay stable across runs.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct VarStore {
    vars: IndexMap<String, String>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the host process environment.
    pub fn from_host_env() -> Self {
        let mut store = Self::new();
        for (name, value) in std::env::vars() {
            store.set(&name, &value);
        }
        store
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Set a variable, replacing any previous value. A name containing `=`
    /// is truncated at the first one; the remainder is discarded.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.split('=').next().unwrap_or(name);
        self.vars.insert(name.to_string(), value.to_string());
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
