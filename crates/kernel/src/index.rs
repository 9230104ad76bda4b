/// Sort direction of one indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Numeric form used in index key documents.
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Declares an index over one or more (possibly nested) fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    keys: Vec<(String, SortOrder)>,
}

impl IndexSpec {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn ascending(mut self, field: impl Into<String>) -> Self {
        self.keys.push((field.into(), SortOrder::Ascending));
        self
    }

    pub fn descending(mut self, field: impl Into<String>) -> Self {
        self.keys.push((field.into(), SortOrder::Descending));
        self
    }

    pub fn keys(&self) -> &[(String, SortOrder)] {
        &self.keys
    }

    /// Server default index name, e.g. `timestamp_-1` or `scores.compound_1`.
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|(field, order)| format!("{}_{}", field, order.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl Default for IndexSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Indexes the `analyses` collection is queried through.
pub fn analysis_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::new().descending("timestamp"),
        IndexSpec::new().ascending("scores.compound"),
    ]
}
