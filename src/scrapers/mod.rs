//! Content sources for an edition.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Modo Energy research | [`modo`] | Paginated JSON content API |
//! | Industry news | [`rss`] | RSS 2.0 / Atom feeds from the configured sources |
//! | Editor picks | [`custom`] | Open Graph tags of individual article pages |
//!
//! All sources fetch through [`GetAsync`](crate::http::GetAsync). Failed
//! requests are logged and skipped; a broken feed never fails the run.

pub mod custom;
pub mod modo;
pub mod rss;
