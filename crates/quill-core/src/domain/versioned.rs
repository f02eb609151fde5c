/// An entity stored as a chain of immutable rows.
///
/// Every update tombstones the current row and inserts a successor with a
/// new id, so `id()` names one version, not the logical entity.
pub trait Versioned: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs.
    const KIND: &'static str;

    /// Owner and content fields of a brand new row.
    type Draft: Send + Sync + 'static;

    /// Mutable fields of an update; `None` carries the current value forward.
    type Patch: Send + Sync + 'static;

    /// Narrows a listing, e.g. the comments of one post.
    type Scope: Send + Sync + 'static;

    fn id(&self) -> i32;

    fn owner_id(&self) -> i32;
}
