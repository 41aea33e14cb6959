//! Request and record types for repository operations.

use search_repository_shared::ItemUUID;

/// Point lookup of items by UUID.
///
/// This is the only read shape the write path needs: it lets callers read back
/// what they wrote. Ranking and full-text search live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemQuery {
    /// UUIDs to fetch. Unknown UUIDs are simply absent from the result.
    pub uuids: Vec<ItemUUID>,
}

impl ItemQuery {
    /// Create a query for the given UUIDs.
    pub fn by_uuids(uuids: impl IntoIterator<Item = ItemUUID>) -> Self {
        Self {
            uuids: uuids.into_iter().collect(),
        }
    }

    /// Create a query for a single UUID.
    pub fn by_uuid(uuid: ItemUUID) -> Self {
        Self { uuids: vec![uuid] }
    }

    pub fn is_empty(&self) -> bool {
        self.uuids.is_empty()
    }
}

/// A raw row as produced by a bulk file import.
///
/// Columns are positional:
/// `[id, type, metadata, indexed_metadata, searchable_metadata,
/// exact_matching_metadata, suggest, coordinate?]`, the metadata columns being
/// JSON text. Missing trailing columns read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    columns: Vec<String>,
}

impl RawRecord {
    pub const ID: usize = 0;
    pub const TYPE: usize = 1;
    pub const METADATA: usize = 2;
    pub const INDEXED_METADATA: usize = 3;
    pub const SEARCHABLE_METADATA: usize = 4;
    pub const EXACT_MATCHING_METADATA: usize = 5;
    pub const SUGGEST: usize = 6;
    pub const COORDINATE: usize = 7;

    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column at `index`, or an empty string when the row is shorter.
    pub fn column(&self, index: usize) -> &str {
        self.columns.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<String> {
        self.columns
    }
}

impl<S: Into<String>> FromIterator<S> for RawRecord {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_short_row_reads_empty() {
        let record: RawRecord = ["1", "book"].into_iter().collect();

        assert_eq!(record.column(RawRecord::ID), "1");
        assert_eq!(record.column(RawRecord::TYPE), "book");
        assert_eq!(record.column(RawRecord::COORDINATE), "");
    }

    #[test]
    fn test_item_query_builders() {
        assert!(ItemQuery::default().is_empty());

        let query = ItemQuery::by_uuids(vec![ItemUUID::new("1", "a"), ItemUUID::new("2", "a")]);
        assert_eq!(query.uuids.len(), 2);
        assert_eq!(ItemQuery::by_uuid(ItemUUID::new("1", "a")).uuids.len(), 1);
    }
}
