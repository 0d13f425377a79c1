//! Project categories and category listing order.

use serde::{Deserialize, Serialize};

/// Fewest categories a project may be filed under.
pub const MIN_PROJECT_CATEGORIES: usize = 1;
/// Most categories a project may be filed under.
pub const MAX_PROJECT_CATEGORIES: usize = 3;

/// Ordering of a category's project listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSort {
    /// Newest projects first.
    #[default]
    Recent,
    /// Most upvoted launches first.
    Upvotes,
    /// Project name, A to Z.
    Alphabetical,
}

/// Trim and lowercase category IDs, dropping blanks and repeats while
/// keeping first-seen order.
pub fn normalize_category_ids(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_lowercase();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
