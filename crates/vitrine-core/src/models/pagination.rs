use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pagination metadata returned alongside list responses.
///
/// `from`/`to` are 1-based indices of the first and last item on the page,
/// or `None` when the page is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub has_more_pages: bool,
}

impl Pagination {
    /// Compute pagination metadata for `page` (1-based) with `per_page` items
    /// out of `total` matching records. `page_len` is the number of items
    /// actually returned on this page.
    pub fn new(page: u32, per_page: u32, total: u64, page_len: usize) -> Self {
        let per = per_page.max(1);
        let last_page = (total.div_ceil(per as u64)).max(1) as u32;
        let (from, to) = if page_len == 0 {
            (None, None)
        } else {
            let first = (page as u64 - 1) * per as u64 + 1;
            (Some(first), Some(first + page_len as u64 - 1))
        };
        Pagination {
            current_page: page,
            per_page: per,
            total,
            last_page,
            from,
            to,
            has_more_pages: (page as u64) * (per as u64) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let p = Pagination::new(2, 10, 35, 10);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.per_page, 10);
        assert_eq!(p.total, 35);
        assert_eq!(p.last_page, 4);
        assert_eq!(p.from, Some(11));
        assert_eq!(p.to, Some(20));
        assert!(p.has_more_pages);
    }

    #[test]
    fn test_last_partial_page() {
        let p = Pagination::new(4, 10, 35, 5);
        assert_eq!(p.from, Some(31));
        assert_eq!(p.to, Some(35));
        assert!(!p.has_more_pages);
    }

    #[test]
    fn test_empty_result() {
        let p = Pagination::new(1, 10, 0, 0);
        assert_eq!(p.last_page, 1);
        assert_eq!(p.from, None);
        assert_eq!(p.to, None);
        assert!(!p.has_more_pages);
    }

    #[test]
    fn test_has_more_pages_boundary() {
        // has_more_pages is true iff page * per_page < total
        assert!(Pagination::new(1, 10, 11, 10).has_more_pages);
        assert!(!Pagination::new(1, 10, 10, 10).has_more_pages);
        assert!(!Pagination::new(2, 10, 20, 10).has_more_pages);
        assert!(Pagination::new(2, 10, 21, 10).has_more_pages);
    }

    #[test]
    fn test_page_beyond_total_is_empty() {
        let p = Pagination::new(9, 10, 35, 0);
        assert_eq!(p.current_page, 9);
        assert_eq!(p.from, None);
        assert!(!p.has_more_pages);
    }
}
