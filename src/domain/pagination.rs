use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A normalized page request.
///
/// Raw page numbers are 1-based and may be zero or negative when they come
/// from an outer surface; those fall back to the first page and the default
/// page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = if page <= 0 { 1 } else { page as usize };
        let page_size = if page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size as usize
        };
        Self { page, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE as i64)
    }
}

/// One page of a listing plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Applies offset/limit to an already filtered and sorted listing.
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> PageResult<T> {
    let total = items.len();
    let items = items.into_iter().skip(offset).take(limit).collect();
    PageResult { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_inputs_use_defaults() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(-3, -1);
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_offset_follows_page() {
        assert_eq!(Pagination::new(1, 20).offset(), 0);
        assert_eq!(Pagination::new(3, 20).offset(), 40);
        // Default page size applies before the offset is computed.
        assert_eq!(Pagination::new(2, 0).offset(), 10);
    }

    #[test]
    fn test_paginate_reports_unpaginated_total() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 20, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);

        let past_end = paginate((1..=5).collect::<Vec<_>>(), 10, 10);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
    }
}
