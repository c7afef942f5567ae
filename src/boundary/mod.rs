//! Delimiter-aligned boundary detection.
//!
//! - [`Delimiter`] - Owned, pre-compiled delimiter pattern
//! - `BoundarySearch` - Resumable forward search over a chunk's overshoot window

mod delimiter;
mod search;

pub use delimiter::Delimiter;
pub(crate) use search::BoundarySearch;
