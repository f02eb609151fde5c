use serde::Serialize;

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    /// Normalize raw query values: a page below 1 becomes 1, a limit below 1
    /// falls back to the default and large limits are capped.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        };
        let limit = match limit {
            Some(l) if l >= 1 => (l as u64).min(Self::MAX_LIMIT),
            _ => Self::DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    /// Rows to skip. Saturates at `i64::MAX`, the largest OFFSET Postgres
    /// accepts, so an absurd page number reads as past the end.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Page::default();
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values_are_normalized() {
        assert_eq!(Page::new(Some(0), Some(0)), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(-3), Some(-1)), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(2), Some(5000)).limit, Page::MAX_LIMIT);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Page::new(Some(3), Some(20)).offset(), 40);
        assert_eq!(Page::new(Some(2), None).offset(), 10);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let page = Page::new(Some(i64::MAX), Some(100));

        assert_eq!(page.page, i64::MAX as u64);
        assert_eq!(page.offset(), i64::MAX as u64);
    }
}
