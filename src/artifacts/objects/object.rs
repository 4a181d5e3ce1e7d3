//! Core object traits.
//!
//! Every object serializes to `<kind> <content-length>\0<content>` and its id
//! is the SHA-1 over those full bytes, header included. Changing the header
//! therefore changes the id.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Serialization to the canonical byte layout (header included).
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialization from the content part of the canonical bytes
/// (the header has already been stripped and validated by the store).
pub trait Unpackable {
    fn deserialize(content: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Common operations over blob, tree and commit objects.
pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// The object id: SHA-1 of the canonical bytes, hex encoded.
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);
        let digest = hasher.finalize();
        ObjectId::try_parse(format!("{digest:x}"))
    }

    /// Storage path relative to the objects directory.
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Prefix `content` with the canonical `<kind> <len>\0` header.
pub(crate) fn pack(kind: ObjectType, content: &[u8]) -> Bytes {
    let mut bytes = Vec::with_capacity(content.len() + 16);
    bytes.extend_from_slice(format!("{} {}\0", kind.as_str(), content.len()).as_bytes());
    bytes.extend_from_slice(content);
    Bytes::from(bytes)
}

/// Tagged container for a decoded object of any kind.
pub enum ObjectBox {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}
