//! Lesson catalog and cross-reference index
//!
//! Scans the markdown content tree, assigns stable article IDs from
//! filename prefixes, extracts cross-references, and builds the
//! bidirectional link index (forward links + derived backlinks).
//! Rebuilt from scratch on each request; no persisted state.

pub mod builder;
pub mod links;

pub use builder::{build_catalog, CatalogItem, CATEGORIES};
