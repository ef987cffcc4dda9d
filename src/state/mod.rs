//! State module for tracking crawl progress
//!
//! - `PageKind`: whether a page is a listing page or a vacancy detail page
//! - `PageState`: the final outcome recorded for every fetched page

mod page_state;

pub use page_state::{PageKind, PageState};
