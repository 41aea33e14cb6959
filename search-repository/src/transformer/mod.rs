pub mod document;
pub mod row;

pub use document::DocumentTransformer;
pub use row::RowTransformer;
