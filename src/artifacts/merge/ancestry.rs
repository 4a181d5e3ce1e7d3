//! Commit-graph reachability.
//!
//! Enumeration is a breadth-first walk over parent edges with a seen set,
//! so diamond-shaped histories are visited once. The enumeration order is
//! part of the contract: `common_ancestor` returns the first commit of
//! `ancestors(a)`, in BFS insertion order, that is also reachable from
//! `b`. With a single merge base that is the merge base; with several
//! (criss-cross histories) it is the base nearest to `a`, deterministically.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// All commits reachable from `start` (inclusive), in BFS insertion order.
pub fn ancestors(database: &Database, start: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
    let mut ordered = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(oid) = queue.pop_front() {
        if !seen.insert(oid.clone()) {
            continue;
        }
        let commit = database.parse_commit(&oid)?;
        ordered.push(oid);
        for parent in commit.parents() {
            queue.push_back(parent.clone());
        }
    }

    Ok(ordered)
}

/// First commit in the enumeration of `ancestors(a)` that is reachable
/// from `b`; `None` for unrelated histories.
pub fn common_ancestor(
    database: &Database,
    a: &ObjectId,
    b: &ObjectId,
) -> anyhow::Result<Option<ObjectId>> {
    let reachable_from_b: HashSet<ObjectId> = ancestors(database, b)?.into_iter().collect();
    Ok(ancestors(database, a)?
        .into_iter()
        .find(|oid| reachable_from_b.contains(oid)))
}

/// Whether `ancestor` is reachable from `descendant` (inclusive).
pub fn is_ancestor(
    database: &Database,
    ancestor: &ObjectId,
    descendant: &ObjectId,
) -> anyhow::Result<bool> {
    Ok(ancestors(database, descendant)?.contains(ancestor))
}
