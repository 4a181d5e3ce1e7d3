//! Object identifier: lowercase hex SHA-1 over canonical object bytes.
//!
//! The empty string is never a valid id. Staged deletions in the index are
//! represented by the absence of an id, not by a sentinel value here.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::DitError;
use std::path::PathBuf;

/// A validated 40-character lowercase hex SHA-1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH
            || !id
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            anyhow::bail!(DitError::CorruptObject(format!("invalid object id '{id}'")));
        }
        Ok(Self(id))
    }

    /// Storage path relative to the objects directory: `aa/bbbb...`.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form for display.
    pub fn short(&self) -> &str {
        &self.0[..7]
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_hex_of_full_length() {
        let id = "a".repeat(40);
        assert!(ObjectId::try_parse(id).is_ok());
    }

    #[test]
    fn rejects_uppercase_and_wrong_length() {
        assert!(ObjectId::try_parse("A".repeat(40)).is_err());
        assert!(ObjectId::try_parse("a".repeat(39)).is_err());
        assert!(ObjectId::try_parse(String::new()).is_err());
    }

    #[test]
    fn splits_into_sharded_path() {
        let id = ObjectId::try_parse(format!("ab{}", "c".repeat(38))).unwrap();
        assert_eq!(id.to_path(), PathBuf::from("ab").join("c".repeat(38)));
    }
}
