//! Three-way per-path classification and conflict representation.
//!
//! Comparison is by blob hash; hash equality implies content equality.
//! Conflict granularity is the whole file.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both sides modified the file relative to the ancestor.
    BothModified,
    /// One side deleted the file, the other modified it.
    DeletedModified,
    /// Both sides added the file with different content.
    AddedModified,
}

/// Outcome of the three-way comparison for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// Keep the current side's content (covers "no change").
    KeepOurs,
    /// Take the target side's content.
    TakeTheirs,
    /// The path is absent from the merged tree.
    Delete,
    Conflict(ConflictKind),
}

/// Classify one path given its blob ids in the ancestor, current ("ours")
/// and target ("theirs") trees; `None` means absent.
pub fn classify(
    ancestor: Option<&ObjectId>,
    ours: Option<&ObjectId>,
    theirs: Option<&ObjectId>,
) -> PathOutcome {
    match (ancestor, ours, theirs) {
        // Nobody has it; nothing to merge.
        (None, None, None) => PathOutcome::Delete,

        (None, None, Some(_)) => PathOutcome::TakeTheirs,
        (None, Some(_), None) => PathOutcome::KeepOurs,
        (None, Some(o), Some(t)) if o == t => PathOutcome::KeepOurs,
        (None, Some(_), Some(_)) => PathOutcome::Conflict(ConflictKind::AddedModified),

        (Some(_), None, None) => PathOutcome::Delete,
        (Some(a), None, Some(t)) if a == t => PathOutcome::Delete,
        (Some(_), None, Some(_)) => PathOutcome::Conflict(ConflictKind::DeletedModified),
        (Some(a), Some(o), None) if a == o => PathOutcome::Delete,
        (Some(_), Some(_), None) => PathOutcome::Conflict(ConflictKind::DeletedModified),

        (Some(a), Some(o), Some(t)) => {
            if o == t || a == t {
                PathOutcome::KeepOurs
            } else if a == o {
                PathOutcome::TakeTheirs
            } else {
                PathOutcome::Conflict(ConflictKind::BothModified)
            }
        }
    }
}

/// A conflicted path with the contents needed to render its marker block.
#[derive(Debug, Clone, new)]
pub struct Conflict {
    pub path: String,
    pub ours: String,
    pub theirs: String,
    pub kind: ConflictKind,
}

impl Conflict {
    /// The block written into the working file.
    pub fn markers(&self) -> String {
        format!(
            "<<<<<<< HEAD\n{}\n=======\n{}\n>>>>>>> {}\n",
            self.ours, self.theirs, self.path
        )
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
    fn additions_on_one_side_are_taken() {
        let x = oid('a');
        assert_eq!(classify(None, None, Some(&x)), PathOutcome::TakeTheirs);
        assert_eq!(classify(None, Some(&x), None), PathOutcome::KeepOurs);
    }

    #[test]
    fn divergent_additions_conflict() {
        let (x, y) = (oid('a'), oid('b'));
        assert_eq!(
            classify(None, Some(&x), Some(&y)),
            PathOutcome::Conflict(ConflictKind::AddedModified)
        );
        assert_eq!(classify(None, Some(&x), Some(&x)), PathOutcome::KeepOurs);
    }

    #[test]
    fn single_sided_edits_win() {
        let (a, b) = (oid('a'), oid('b'));
        assert_eq!(classify(Some(&a), Some(&a), Some(&a)), PathOutcome::KeepOurs);
        assert_eq!(classify(Some(&a), Some(&a), Some(&b)), PathOutcome::TakeTheirs);
        assert_eq!(classify(Some(&a), Some(&b), Some(&a)), PathOutcome::KeepOurs);
    }

    #[test]
    fn divergent_edits_conflict() {
        let (a, b, c) = (oid('a'), oid('b'), oid('c'));
        assert_eq!(
            classify(Some(&a), Some(&b), Some(&c)),
            PathOutcome::Conflict(ConflictKind::BothModified)
        );
        // Identical edits on both sides merge cleanly.
        assert_eq!(classify(Some(&a), Some(&b), Some(&b)), PathOutcome::KeepOurs);
    }

    #[test]
    fn clean_deletions_are_accepted() {
        let a = oid('a');
        assert_eq!(classify(Some(&a), None, Some(&a)), PathOutcome::Delete);
        assert_eq!(classify(Some(&a), Some(&a), None), PathOutcome::Delete);
        assert_eq!(classify(Some(&a), None, None), PathOutcome::Delete);
    }

    #[test]
    fn deletion_against_edit_conflicts() {
        let (a, b) = (oid('a'), oid('b'));
        assert_eq!(
            classify(Some(&a), None, Some(&b)),
            PathOutcome::Conflict(ConflictKind::DeletedModified)
        );
        assert_eq!(
            classify(Some(&a), Some(&b), None),
            PathOutcome::Conflict(ConflictKind::DeletedModified)
        );
    }

    proptest::proptest! {
        // Swapping sides flips keep/take but never changes whether a path
        // conflicts or is deleted, so a conflict-free merge produces the
        // same tree regardless of which side is "ours".
        #[test]
        fn classification_is_symmetric(
            ancestor in proptest::option::of(0u8..4),
            ours in proptest::option::of(0u8..4),
            theirs in proptest::option::of(0u8..4),
        ) {
            let as_oid = |tag: u8| {
                ObjectId::try_parse(format!("{:040x}", tag as u128)).unwrap()
            };
            let a = ancestor.map(as_oid);
            let o = ours.map(as_oid);
            let t = theirs.map(as_oid);

            let forward = classify(a.as_ref(), o.as_ref(), t.as_ref());
            let backward = classify(a.as_ref(), t.as_ref(), o.as_ref());

            let mirrored = match backward {
                PathOutcome::KeepOurs => PathOutcome::TakeTheirs,
                PathOutcome::TakeTheirs => PathOutcome::KeepOurs,
                other => other,
            };

            match (forward, mirrored) {
                (PathOutcome::Conflict(_), PathOutcome::Conflict(_)) => {}
                (PathOutcome::Delete, PathOutcome::Delete) => {}
                (left, right) => {
                    // Keep/take may differ when both sides carry identical
                    // content; the chosen blob is the same either way.
                    let pick = |outcome| match outcome {
                        PathOutcome::KeepOurs => o.clone(),
                        PathOutcome::TakeTheirs => t.clone(),
                        _ => None,
                    };
                    proptest::prop_assert_eq!(pick(left), pick(right));
                }
            }
        }
    }

    #[test]
    fn marker_block_layout_is_exact() {
        let conflict = Conflict::new(
            "a.txt".to_string(),
            "B".to_string(),
            "A".to_string(),
            ConflictKind::BothModified,
        );
        assert_eq!(
            conflict.markers(),
            "<<<<<<< HEAD\nB\n=======\nA\n>>>>>>> a.txt\n"
        );
    }
}
