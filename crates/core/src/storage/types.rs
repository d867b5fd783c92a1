use serde::{Deserialize, Serialize};

/// Pagination window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a page, clamping `limit` to `1..=MAX_LIMIT`.
    ///
    /// # Examples
    ///
    /// ```
    /// use postline_core::storage::Page;
    ///
    /// assert_eq!(Page::new(0, 5).limit, 1);
    /// assert_eq!(Page::new(500, 0).limit, Page::MAX_LIMIT);
    /// ```
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
        }
    }

    /// Builds a page from optional query parameters, applying defaults.
    pub fn from_query(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self::new(limit.unwrap_or(Self::DEFAULT_LIMIT), offset.unwrap_or(0))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        let page = Page::default();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 0);
        assert_eq!(Page::from_query(None, None), page);
    }

    #[test]
    fn test_from_query_clamps_limit() {
        assert_eq!(Page::from_query(Some(0), Some(3)), Page { limit: 1, offset: 3 });
        assert_eq!(Page::from_query(Some(1000), None).limit, 100);
        assert_eq!(Page::from_query(Some(25), None).limit, 25);
    }
}
