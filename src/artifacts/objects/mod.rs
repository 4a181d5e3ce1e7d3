pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a full object id in hex characters.
pub const OBJECT_ID_LENGTH: usize = 40;

/// Minimum prefix length accepted for short-hash lookup.
pub const SHORT_HASH_MIN_LENGTH: usize = 6;
