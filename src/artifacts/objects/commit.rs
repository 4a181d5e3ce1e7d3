//! Commit object.
//!
//! Content layout:
//!
//! ```text
//! tree <hash>
//! parent <hash>        (zero, one or two)
//! author <name> <epoch-seconds>
//!
//! <message>
//! ```
//!
//! A commit has at most two parents: none for a root commit, one for a
//! normal commit, two for a merge. Higher arities are rejected on
//! construction and on decode.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, pack};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::DitError;
use bytes::Bytes;

const MAX_PARENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree_oid: ObjectId,
    parents: Vec<ObjectId>,
    author: String,
    timestamp: i64,
    message: String,
}

impl Commit {
    pub fn new(
        tree_oid: ObjectId,
        parents: Vec<ObjectId>,
        author: String,
        timestamp: i64,
        message: String,
    ) -> anyhow::Result<Self> {
        if parents.len() > MAX_PARENTS {
            anyhow::bail!(DitError::CorruptObject(format!(
                "commit with {} parents",
                parents.len()
            )));
        }
        let author = author.trim().to_string();
        if author.is_empty() {
            anyhow::bail!(DitError::CorruptObject("commit without author".to_string()));
        }
        Ok(Commit {
            tree_oid,
            parents,
            author,
            timestamp,
            message,
        })
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = String::new();
        content.push_str(&format!("tree {}\n", self.tree_oid));
        for parent in &self.parents {
            content.push_str(&format!("parent {parent}\n"));
        }
        content.push_str(&format!("author {} {}\n", self.author, self.timestamp));
        content.push('\n');
        content.push_str(&self.message);
        content.push('\n');

        Ok(pack(ObjectType::Commit, content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(content: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(content)
            .map_err(|_| DitError::CorruptObject("commit content is not UTF-8".to_string()))?;

        let (header, message) = text
            .split_once("\n\n")
            .ok_or_else(|| DitError::CorruptObject("commit without message block".to_string()))?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author_line = None;
        for line in header.lines() {
            if let Some(rest) = line.strip_prefix("tree ") {
                tree_oid = Some(ObjectId::try_parse(rest.trim().to_string())?);
            } else if let Some(rest) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(rest.trim().to_string())?);
            } else if let Some(rest) = line.strip_prefix("author ") {
                author_line = Some(rest.trim());
            }
        }

        let tree_oid = tree_oid
            .ok_or_else(|| DitError::CorruptObject("commit without tree line".to_string()))?;
        let author_line = author_line
            .ok_or_else(|| DitError::CorruptObject("commit without author line".to_string()))?;

        // The author name may contain spaces; the timestamp is the final
        // space-separated field.
        let (author, timestamp) = author_line
            .rsplit_once(' ')
            .ok_or_else(|| DitError::CorruptObject("malformed author line".to_string()))?;
        let timestamp: i64 = timestamp
            .parse()
            .map_err(|_| DitError::CorruptObject("malformed commit timestamp".to_string()))?;

        Commit::new(
            tree_oid,
            parents,
            author.to_string(),
            timestamp,
            message.trim_end_matches('\n').to_string(),
        )
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn content_of(commit: &Commit) -> Vec<u8> {
        let bytes = commit.serialize().unwrap();
        let nul = bytes.iter().position(|b| *b == 0).unwrap();
        bytes[nul + 1..].to_vec()
    }

    #[test]
    fn serializes_header_then_blank_line_then_message() {
        let commit = Commit::new(oid('a'), vec![oid('b')], "alice".to_string(), 42, "c1".to_string())
            .unwrap();
        let content = String::from_utf8(content_of(&commit)).unwrap();
        assert_eq!(
            content,
            format!("tree {}\nparent {}\nauthor alice 42\n\nc1\n", oid('a'), oid('b'))
        );
    }

    #[test]
    fn round_trips_with_multiple_parents_and_spaced_author() {
        let commit = Commit::new(
            oid('a'),
            vec![oid('b'), oid('c')],
            "Grace Hopper".to_string(),
            1_700_000_000,
            "merge the feature\n\nwith a body".to_string(),
        )
        .unwrap();

        let decoded = Commit::deserialize(&content_of(&commit)).unwrap();
        assert_eq!(decoded, commit);
    }

    #[test]
    fn more_than_two_parents_is_rejected() {
        let result = Commit::new(
            oid('a'),
            vec![oid('b'), oid('c'), oid('d')],
            "alice".to_string(),
            0,
            "octopus".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn root_commit_has_no_parents() {
        let commit =
            Commit::new(oid('a'), vec![], "alice".to_string(), 7, "root".to_string()).unwrap();
        let decoded = Commit::deserialize(&content_of(&commit)).unwrap();
        assert!(decoded.parents().is_empty());
    }
}
