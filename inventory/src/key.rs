use std::fmt;

/// Opaque identifier of an activity or biosphere flow.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    pub database: String,
    pub code: String,
}

impl Key {
    pub fn new(database: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.database, self.code)
    }
}

/// Borrowed form of [`Key`], for lookups without allocating.
// NB field order and types must hash exactly like `Key`:
// `String` hashes the same as `str`, and derived `Hash` hashes fields in order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) struct KeyRef<'a> {
    pub database: &'a str,
    pub code: &'a str,
}

impl hashbrown::Equivalent<Key> for KeyRef<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        self.database == key.database && self.code == key.code
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::hash::BuildHasher;

    #[test]
    fn test_key_ref_hashes_like_key() {
        let hasher = util::Hasher::default();
        let key = Key::new("test", "A");
        let key_ref = KeyRef {
            database: "test",
            code: "A",
        };
        assert_eq!(hasher.hash_one(&key), hasher.hash_one(key_ref));
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::new("biosphere", "CO2").to_string(), "(biosphere, CO2)");
    }
}
