//! Tree object: one directory snapshot.
//!
//! Content is one line per entry, `<kind> <hash> <name>\n`, ordered by name
//! with byte-wise ascending comparison. Names are unique within a tree and
//! must not contain `/` or NUL.
//!
//! `write_from_map` materializes a whole tree DAG from a flat
//! path-to-blob map: entries are grouped by directory (every ancestor
//! directory present, root included), directories are emitted bottom-up so
//! each parent can reference its children's already-written hashes.

use crate::areas::database::Database;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, pack};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::DitError;
use bytes::Bytes;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: ObjectType,
    pub oid: ObjectId,
    pub name: String,
}

impl TreeEntry {
    pub fn new(kind: ObjectType, oid: ObjectId, name: String) -> anyhow::Result<Self> {
        if kind == ObjectType::Commit {
            anyhow::bail!(DitError::CorruptObject(
                "tree entries may only reference blobs or trees".to_string()
            ));
        }
        if name.is_empty() || name.contains('/') || name.contains('\0') {
            anyhow::bail!(DitError::CorruptObject(format!(
                "invalid tree entry name '{name}'"
            )));
        }
        Ok(TreeEntry { kind, oid, name })
    }

    fn to_line(&self) -> String {
        format!("{} {} {}\n", self.kind.as_str(), self.oid, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries, enforcing name ordering and uniqueness.
    pub fn new(mut entries: Vec<TreeEntry>) -> anyhow::Result<Self> {
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        for pair in entries.windows(2) {
            if pair[0].name == pair[1].name {
                anyhow::bail!(DitError::CorruptObject(format!(
                    "duplicate tree entry '{}'",
                    pair[0].name
                )));
            }
        }
        Ok(Tree { entries })
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Write the tree DAG for a flat `path -> blob id` map and return the
    /// root tree id. An empty map yields the empty tree.
    pub fn write_from_map(
        database: &Database,
        files: &BTreeMap<String, ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        // Group blob entries by containing directory; "" is the root. Every
        // ancestor directory must exist as a group even when it holds no
        // blobs of its own.
        let mut directories: BTreeMap<String, BTreeMap<String, (ObjectType, ObjectId)>> =
            BTreeMap::new();
        directories.insert(String::new(), BTreeMap::new());

        for (path, oid) in files {
            let (dir, name) = split_parent(path);
            directories
                .entry(dir.to_string())
                .or_default()
                .insert(name.to_string(), (ObjectType::Blob, oid.clone()));

            let mut ancestor = dir;
            while !ancestor.is_empty() {
                directories.entry(ancestor.to_string()).or_default();
                ancestor = split_parent(ancestor).0;
            }
        }

        // Emit deepest directories first so parent trees can reference the
        // hashes of their children.
        let mut ordered: Vec<String> = directories.keys().cloned().collect();
        ordered.sort_by_key(|dir| std::cmp::Reverse(depth_of(dir)));

        let mut written: BTreeMap<String, ObjectId> = BTreeMap::new();
        for dir in ordered {
            let mut contents = directories.remove(&dir).unwrap_or_default();

            for (sub_dir, sub_oid) in &written {
                if split_parent(sub_dir).0 == dir {
                    let name = split_parent(sub_dir).1;
                    contents.insert(name.to_string(), (ObjectType::Tree, sub_oid.clone()));
                }
            }

            let entries = contents
                .into_iter()
                .map(|(name, (kind, oid))| TreeEntry::new(kind, oid, name))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let oid = database.store(&Tree::new(entries)?)?;
            written.insert(dir, oid);
        }

        written
            .remove("")
            .ok_or_else(|| anyhow::anyhow!("tree build produced no root"))
    }
}

/// Split a slash-separated path into (parent directory, final component).
/// The parent of a top-level name is the empty string.
fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

fn depth_of(dir: &str) -> usize {
    if dir.is_empty() {
        0
    } else {
        dir.split('/').count()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = self
            .entries
            .iter()
            .map(TreeEntry::to_line)
            .collect::<String>();
        Ok(pack(ObjectType::Tree, content.as_bytes()))
    }
}

impl Unpackable for Tree {
    fn deserialize(content: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(content)
            .map_err(|_| DitError::CorruptObject("tree content is not UTF-8".to_string()))?;

        let mut entries = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ' ');
            let (kind, oid, name) = match (parts.next(), parts.next(), parts.next()) {
                (Some(kind), Some(oid), Some(name)) => (kind, oid, name),
                _ => {
                    anyhow::bail!(DitError::CorruptObject(format!(
                        "malformed tree entry '{line}'"
                    )))
                }
            };
            entries.push(TreeEntry::new(
                ObjectType::try_from(kind)?,
                ObjectId::try_parse(oid.to_string())?,
                name.to_string(),
            )?);
        }

        Tree::new(entries)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn empty_tree_has_the_known_id() {
        let tree = Tree::default();
        assert_eq!(
            tree.object_id().unwrap().as_ref(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn entries_serialize_sorted_by_name() {
        let tree = Tree::new(vec![
            TreeEntry::new(ObjectType::Blob, oid('b'), "z.txt".to_string()).unwrap(),
            TreeEntry::new(ObjectType::Blob, oid('a'), "a.txt".to_string()).unwrap(),
        ])
        .unwrap();

        let bytes = tree.serialize().unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let content = text.split_once('\0').unwrap().1;
        assert_eq!(
            content,
            format!("blob {} a.txt\nblob {} z.txt\n", oid('a'), oid('b'))
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = Tree::new(vec![
            TreeEntry::new(ObjectType::Blob, oid('a'), "a.txt".to_string()).unwrap(),
            TreeEntry::new(ObjectType::Blob, oid('b'), "a.txt".to_string()).unwrap(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn names_with_separators_are_rejected() {
        assert!(TreeEntry::new(ObjectType::Blob, oid('a'), "a/b".to_string()).is_err());
        assert!(TreeEntry::new(ObjectType::Blob, oid('a'), "a\0b".to_string()).is_err());
    }

    #[test]
    fn round_trips_through_the_codec() {
        let tree = Tree::new(vec![
            TreeEntry::new(ObjectType::Blob, oid('a'), "a.txt".to_string()).unwrap(),
            TreeEntry::new(ObjectType::Tree, oid('c'), "src".to_string()).unwrap(),
        ])
        .unwrap();

        let bytes = tree.serialize().unwrap();
        let content = &bytes[bytes.iter().position(|b| *b == 0).unwrap() + 1..];
        assert_eq!(Tree::deserialize(content).unwrap(), tree);
    }
}
