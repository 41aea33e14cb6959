//! # Search Repository Shared
//!
//! This crate defines the canonical item model shared by every part of the search
//! repository write path: the item itself, its composite UUID, the optional
//! geographic coordinate and the rating rules applied when items are built.

pub mod types;

pub use types::coordinate::Coordinate;
pub use types::item::{Item, MetadataMap};
pub use types::item_uuid::ItemUUID;
pub use types::rating;
