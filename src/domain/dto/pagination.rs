//! 페이지네이션
//!
//! 모든 목록 API가 같은 규칙을 사용합니다.
//!
//! - `page < 1` → 1, `page > MAX_PAGE` → `MAX_PAGE`
//! - `limit < 1` → 20, `limit > 100` → 100
//! - `skip = (page - 1) * limit`

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;
/// `skip`이 i64 범위를 넘지 않는 최대 페이지
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_LIMIT;

/// 정규화된 페이지 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE);
        let limit = match limit {
            Some(l) if l < 1 => DEFAULT_PAGE_LIMIT,
            Some(l) if l > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
            Some(l) => l,
            None => DEFAULT_PAGE_LIMIT,
        };
        Self { page, limit }
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: i64,
    pub limit: i64,
    pub skip: i64,
    pub total: i64,
    pub total_page: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total_page = if total <= 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };

        Self {
            current_page: request.page,
            limit: request.limit,
            skip: request.skip(),
            total,
            total_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_normalization() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::new(Some(-3), Some(500)), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(3), Some(10)).skip(), 20);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let request = PageRequest::new(Some(i64::MAX), Some(20));
        assert_eq!(request.page, MAX_PAGE);
        assert!(request.skip() >= 0);

        let request = PageRequest::new(Some(i64::MAX), Some(MAX_PAGE_LIMIT));
        assert!(request.skip() >= 0);

        let pagination = Pagination::new(request, 5);
        assert_eq!(pagination.total_page, 1);
        assert!(pagination.skip > 0);
    }

    #[test]
    fn test_pagination_total_pages() {
        let request = PageRequest::new(Some(2), Some(10));
        let pagination = Pagination::new(request, 25);

        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.skip, 10);
        assert_eq!(pagination.total_page, 3);

        assert_eq!(Pagination::new(request, 0).total_page, 0);
        assert_eq!(Pagination::new(request, 10).total_page, 1);
    }
}
