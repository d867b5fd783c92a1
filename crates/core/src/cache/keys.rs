use crate::blog::{Entity, Id};

/// Returns the cache key for an entity kind and id, e.g. `post_42`.
///
/// # Examples
///
/// ```
/// use postline_core::cache::entity_key_for;
///
/// assert_eq!(entity_key_for("post", 42), "post_42");
/// ```
pub fn entity_key_for(kind: &str, id: Id) -> String {
    format!("{}_{}", kind, id)
}

/// Returns the cache key for an entity of type `E`.
pub fn entity_key<E: Entity>(id: Id) -> String {
    entity_key_for(E::KIND, id)
}
