//! Response-side list slicing.

use crate::pagination::params::Pagination;

impl Pagination {
    /// Keep items `[start, start + limit)` in their original order.
    ///
    /// Out-of-range windows are clamped; huge values never overflow.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.start).take(self.limit).collect()
    }
}
