//! Free-text and zone filtering.

pub mod filter;
pub mod text;

pub use filter::{apply, toggle_category, FilterState};
pub use text::{fold, fold_query};
