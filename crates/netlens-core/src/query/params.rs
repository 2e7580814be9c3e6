//! Parameters of one paginated request.

use serde::{Deserialize, Serialize};

use super::{FilterSet, PageState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub limit: u32,
    pub offset: u64,
    pub filters: FilterSet,
}

impl QueryParams {
    pub fn new(page: &PageState, filters: &FilterSet) -> Self {
        Self {
            limit: page.limit(),
            offset: page.offset(),
            filters: filters.clone(),
        }
    }

    /// Query string pairs: `limit`, `offset`, then every non-empty filter.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        pairs
    }
}
