//! Shared utility modules used across Sentilex components.

pub mod prime;
