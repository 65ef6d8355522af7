use serde::{Deserialize, Serialize};

const DEFAULT_TAKE: i64 = 10;
const MAX_TAKE: i64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub take: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn take(&self) -> i64 {
        self.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE)
    }

    pub fn skip(&self) -> u64 {
        (self.page() - 1) * self.take() as u64
    }
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: u64,
    pub take: i64,
    pub total: u64,
}

/// Standard list envelope: `{ "data": [...], "meta": { page, take, total } }`.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, query: &PageQuery, total: u64) -> Self {
        Paginated {
            data,
            meta: PageMeta {
                page: query.page(),
                take: query.take(),
                total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        let query = PageQuery {
            page: None,
            take: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.take(), 10);
        assert_eq!(query.skip(), 0);
    }

    #[test]
    fn skip_follows_page_and_take() {
        let query = PageQuery {
            page: Some(3),
            take: Some(20),
        };
        assert_eq!(query.skip(), 40);
    }

    #[test]
    fn take_is_clamped() {
        let query = PageQuery {
            page: Some(0),
            take: Some(5000),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.take(), 100);
    }
}
