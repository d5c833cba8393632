//! Outcome taxonomy for page and tree operations.
//!
//! Ordinary failures never unwind mid-operation: an operation that
//! returns one of these leaves the page or tree exactly as it was. The
//! variants travel inside `eyre::Report` and can be recovered with
//! `report.downcast_ref::<BtreeError>()`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BtreeError {
    /// Insert of a key that is already present.
    #[error("key already exists")]
    KeyExists,

    /// Update of a key that is not present.
    #[error("key does not exist")]
    KeyNotExists,

    /// The page cannot hold the record, even after garbage collection
    /// has been considered.
    #[error("not enough free space in page")]
    NoSpace,

    /// A key rewrite would break the slot ordering of the page.
    #[error("key would violate slot ordering")]
    InvalidKey,
}
