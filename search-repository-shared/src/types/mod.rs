//! This module defines the core data structures used across the search repository.
//! It re-exports the item model types like `Item` and `ItemUUID`.

pub mod coordinate;
pub mod item;
pub mod item_uuid;
pub mod rating;

pub use coordinate::Coordinate;
pub use item::{Item, MetadataMap};
pub use item_uuid::ItemUUID;
