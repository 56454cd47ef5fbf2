use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination window, taken from query parameters.
#[derive(
    IntoParams, Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub struct Paginated {
    /// The first item to return, skipping all that come before it.
    #[serde(default)]
    pub offset: u64,

    /// The maximum number of entries to return.
    ///
    /// Zero means: no limit.
    #[serde(default)]
    pub limit: u64,
}

impl Paginated {
    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }
}

/// A page of items, plus the total number of matches before paging.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct PaginatedResults<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PaginatedResults<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResults<U> {
        PaginatedResults {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
