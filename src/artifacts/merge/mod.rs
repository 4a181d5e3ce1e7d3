pub mod ancestry;
pub mod conflict;
pub mod merge_state;
