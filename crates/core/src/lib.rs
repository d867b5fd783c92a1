//! Functional core for postline.
//!
//! Pure types and functions for the blogging domain: entities, request and
//! response shaping, validation, the ownership guard, and the storage and
//! cache contracts implemented by the server crate.

pub mod authz;
pub mod blog;
pub mod cache;
pub mod storage;
