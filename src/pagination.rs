pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// 1-based page request translated into SQL `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Saturates, so a page far past the end reads as an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero rows means zero pages.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let page = PageRequest { page: 3, limit: 10 };
        assert_eq!(page.offset(), 20);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn test_offset_saturates_for_huge_pages() {
        let page = PageRequest {
            page: i64::MAX,
            limit: 100,
        };
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let page = PageRequest { page: 1, limit: 10 };
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
        assert_eq!(page.total_pages(200), 20);
    }

    #[test]
    fn test_pages_cover_every_row_once() {
        let rows: Vec<i64> = (0..23).collect();
        let limit = 5;
        let first = PageRequest { page: 1, limit };
        let pages = first.total_pages(rows.len() as i64);

        let mut seen = Vec::new();
        for page in 1..=pages {
            let req = PageRequest { page, limit };
            let start = req.offset() as usize;
            let end = (start + limit as usize).min(rows.len());
            seen.extend_from_slice(&rows[start..end]);
        }
        assert_eq!(seen, rows);
    }
}
