// src/paths/mod.rs

//! Path-set primitives the registry is built on.
//!
//! - `collapse`: ancestor checks and reduction of a path list to its topmost
//!   entries.
//! - `tree`: a directory tree with include/exclude globs.
//! - `set`: a watch request (plain roots + trees) and its union builder.

pub mod collapse;
pub mod set;
pub mod tree;

pub use collapse::{collapse_roots, is_ancestor_of_any, is_within};
pub use set::{RequestedPathSet, RequestedPathSetBuilder};
pub use tree::FilteredTree;
