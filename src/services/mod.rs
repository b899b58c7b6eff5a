pub mod jobs;
pub mod staff_admin;
pub mod users;
pub mod vendors;

use serde::Serialize;

/// Page envelope shared by the list endpoints.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub data: Vec<T>,
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl<T> PageEnvelope<T> {
    pub fn new(data: Vec<T>, count: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (count + limit - 1) / limit
        } else {
            0
        };
        Self {
            data,
            count,
            page,
            limit,
            total_pages,
        }
    }
}

/// Clamp raw pagination parameters to the 1-based page / positive limit the
/// query layer expects. Defaults: page 1, limit 10.
pub fn normalize_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_page_defaults() {
        assert_eq!(normalize_page(None, None), (1, 10));
        assert_eq!(normalize_page(Some(0), Some(0)), (1, 1));
        assert_eq!(normalize_page(Some(3), Some(25)), (3, 25));
        assert_eq!(normalize_page(Some(-1), Some(1000)), (1, 100));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let envelope = PageEnvelope::new(Vec::<u8>::new(), 21, 1, 10);
        assert_eq!(envelope.total_pages, 3);

        let envelope = PageEnvelope::new(Vec::<u8>::new(), 0, 1, 10);
        assert_eq!(envelope.total_pages, 0);
    }
}
