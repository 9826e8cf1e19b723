//! Type alias for operations that succeed while reporting non-fatal problems.

/// A successful result together with the non-fatal problems met along the way.
/// The `Vec<W>` holds warnings that were handled gracefully and did not prevent
/// the operation from completing.
pub type PartialSuccess<T, W> = ( T, Vec<W> );
