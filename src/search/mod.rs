//! Query compilation and per-file scanning.
//!
//! [`matcher`] turns a set of search options into one matching procedure;
//! [`scan`] runs it over an indexed snapshot, assembling positioned matches
//! with context and previews. The driving loop that walks eligible files
//! lives on [`crate::engine::SearchEngine`].

pub mod matcher;
pub(crate) mod scan;

pub use matcher::QueryMatcher;
