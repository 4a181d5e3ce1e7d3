//! Blob object: raw file bytes, verbatim.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, pack};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(pack(ObjectType::Blob, &self.content))
    }
}

impl Unpackable for Blob {
    fn deserialize(content: &[u8]) -> anyhow::Result<Self> {
        Ok(Blob::new(Bytes::copy_from_slice(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}
