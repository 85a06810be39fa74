use std::fmt::Display;

/// Common key-construction helpers shared by every store.
///
/// Layout: `{prefix}:{collection}:{id}` for entity documents,
/// `{prefix}:rel:{alias}:{left}` for relation sets,
/// `{prefix}:{collection}:unique:{field}:{value}` for unique claims,
/// `{prefix}:seq:{collection}` for id sequences and
/// `{prefix}:session:{token}` for session bindings.
#[derive(Debug, Clone)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn entity(&self, collection: &str, entity_id: impl Display) -> String {
        format!("{}:{}:{}", self.prefix, collection, entity_id)
    }

    pub fn sequence(&self, collection: &str) -> String {
        format!("{}:seq:{}", self.prefix, collection)
    }

    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!("{}:{}:unique:{}:{}", self.prefix, collection, field, value)
    }

    pub fn relation(&self, alias: &str, left_id: impl Display) -> String {
        format!("{}:rel:{}:{}", self.prefix, alias, left_id)
    }

    /// Index set holding the ids of every entity in a collection.
    pub fn index(&self, collection: &str) -> String {
        format!("{}:idx:{}", self.prefix, collection)
    }

    pub fn session(&self, token: &str) -> String {
        format!("{}:session:{}", self.prefix, token)
    }

    /// Glob pattern matching every key under this prefix (test cleanup).
    pub fn pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }
}
