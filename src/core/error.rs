//! Catalog error types.

use super::beat::BeatId;
use thiserror::Error;

/// Errors raised by catalog lookups and catalog construction.
///
/// A `NotFound` during traversal means a path holds an id the catalog does
/// not know, which only happens through corrupted or stale input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown beat id {0}")]
    NotFound(BeatId),

    #[error("Catalog has no beats")]
    Empty,

    #[error("Catalog ids must run 1..=n in order: position {position} holds id {found}")]
    NonDenseIds { position: usize, found: BeatId },
}
