//! Word statistics storage.
//!
//! [`record::Record`] is the per-word statistics value and
//! [`hash_index::HashIndex`] is the open-addressing table that owns all
//! records and maps words to them.

pub mod hash_index;
pub mod record;
