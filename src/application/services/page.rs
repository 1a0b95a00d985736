//! Paginated result sets.

use serde::{Deserialize, Serialize};

/// One page of a listing together with the total row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.page_size == 0 {
            return 0;
        }
        let size = i64::from(self.page_size);
        (self.total + size - 1) / size
    }
}

/// Converts a 1-based page number and size into SQL `(offset, limit)`.
pub fn offset_limit(page: u32, page_size: u32) -> (i64, i64) {
    let page = i64::from(page.max(1));
    let size = i64::from(page_size);
    ((page - 1) * size, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_limit() {
        assert_eq!(offset_limit(1, 25), (0, 25));
        assert_eq!(offset_limit(3, 50), (100, 50));
        assert_eq!(offset_limit(0, 10), (0, 10));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::<u8> {
            items: vec![],
            page: 1,
            page_size: 25,
            total: 51,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
