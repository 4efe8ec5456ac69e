//! Output generation: the terminal review listing, newsletter items and the
//! JSON digest.
//!
//! # Submodules
//!
//! - [`terminal`]: Plain-text listings printed for the editor to review
//! - [`newsletter`]: News items shaped for the newsletter template
//! - [`json`]: Writes the [`Digest`](crate::models::Digest) consumed by downstream tooling
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── europe.json
//!     ├── us.json
//!     └── australia.json
//! ```

pub mod json;
pub mod newsletter;
pub mod terminal;
