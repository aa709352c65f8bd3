//! Typed view of a Baseline configuration manifest.
//!
//! A manifest is either a flat property list or a mobileconfig whose first
//! `PayloadContent` entry carries the same keys. Parsing validates the
//! schema up front: every item must carry a `DisplayName` and every
//! interpreted field must have the expected type.

pub mod arguments;
mod document;
mod item;

pub use document::{Manifest, ManifestBody, ManifestFormat, STAMP_KEY};
pub use item::{Category, DialogOption, Item};
