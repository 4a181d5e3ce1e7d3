//! Checkout/merge target resolution.
//!
//! A target is tried as `HEAD`, then as a branch name, then as a full
//! commit hash, then as a short (six to thirty-nine hex characters) prefix.

use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_HASH_MIN_LENGTH};
use crate::errors::DitError;

/// A resolved target: the commit it names and, when it was a branch, the
/// branch name (so checkout can keep HEAD symbolic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub oid: ObjectId,
    pub branch: Option<String>,
}

impl Revision {
    pub fn resolve(repository: &Repository, target: &str) -> anyhow::Result<Revision> {
        if target == "HEAD" {
            let oid = repository
                .refs()
                .read_head()?
                .ok_or_else(|| DitError::MissingRef("HEAD".to_string()))?;
            return Ok(Revision { oid, branch: None });
        }

        if repository.refs().branch_exists(target) {
            let ref_path = crate::areas::refs::Refs::branch_ref_path(target);
            let oid = repository
                .refs()
                .read_ref(&ref_path)?
                .ok_or_else(|| DitError::MissingRef(target.to_string()))?;
            return Ok(Revision {
                oid,
                branch: Some(target.to_string()),
            });
        }

        if target.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(target.to_string())
                .map_err(|_| DitError::MissingRef(target.to_string()))?;
            require_commit(repository, &oid)?;
            return Ok(Revision { oid, branch: None });
        }

        if target.len() >= SHORT_HASH_MIN_LENGTH
            && target.len() < OBJECT_ID_LENGTH
            && target.chars().all(|c| c.is_ascii_hexdigit())
        {
            let oid = repository.database().find_by_prefix(target)?;
            require_commit(repository, &oid)?;
            return Ok(Revision { oid, branch: None });
        }

        anyhow::bail!(DitError::MissingRef(target.to_string()))
    }
}

fn require_commit(repository: &Repository, oid: &ObjectId) -> anyhow::Result<()> {
    if !repository.database().contains(oid) {
        anyhow::bail!(DitError::MissingObject(oid.to_string()));
    }
    if repository.database().object_type(oid)? != ObjectType::Commit {
        anyhow::bail!(DitError::NotACommit(oid.to_string()));
    }
    Ok(())
}
