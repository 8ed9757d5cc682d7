use std::str::FromStr;
use serde::Deserialize;

/// How a registry folds a new request into the watch points it already has.
///
/// - `Collapse`: the live watch set is re-collapsed after every request, so
///   no watch point ever nests inside another (default behaviour).
/// - `Append`: new watch points are added even when a coarser ancestor is
///   already watched; only exact duplicates are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    Collapse,
    Append,
}

impl MergePolicy {
    /// Map the `allow_new_points_under_existing_roots` flag onto a policy.
    pub fn from_allow_nested(allow_new_points_under_existing_roots: bool) -> Self {
        if allow_new_points_under_existing_roots {
            MergePolicy::Append
        } else {
            MergePolicy::Collapse
        }
    }

    pub fn allows_nested_points(self) -> bool {
        matches!(self, MergePolicy::Append)
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::Collapse
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collapse" => Ok(MergePolicy::Collapse),
            "append" => Ok(MergePolicy::Append),
            other => Err(format!(
                "invalid merge_policy: {other} (expected \"collapse\" or \"append\")"
            )),
        }
    }
}
