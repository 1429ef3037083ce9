use hyper::{StatusCode, Uri};
use serde::{Deserialize, Serialize};

use crate::store::Window;

use super::app_error::AppError;

/// `?limit=&offset=` pagination. Invalid values are ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl PaginationParams {
    /// `None` when the client did not ask for a page, the listing is then returned whole
    pub fn window(&self) -> Option<Window> {
        let limit = self
            .limit
            .as_deref()
            .and_then(|limit| limit.parse::<i64>().ok())
            .filter(|limit| *limit > 0)?;
        let offset = self
            .offset
            .as_deref()
            .and_then(|offset| offset.parse::<i64>().ok())
            .filter(|offset| *offset >= 0)
            .unwrap_or(0);
        Some(Window { limit, offset })
    }
}

/// `?page=` pagination with a server-side page size
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    /// Returns the requested page number, the first one when absent, and its window
    pub fn window(&self, page_size: i64) -> Result<(i64, Window), AppError> {
        let page = match self.page.as_deref().filter(|page| !page.is_empty()) {
            None => 1,
            Some(page) => page
                .parse::<i64>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(invalid_page_error)?,
        };
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(invalid_page_error)?;
        Ok((
            page,
            Window {
                limit: page_size,
                offset,
            },
        ))
    }
}

fn invalid_page_error() -> AppError {
    AppError::detail(StatusCode::NOT_FOUND, "Invalid page.")
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Wrap a limit/offset slice with links to its neighbours
pub fn limit_offset_page<T>(uri: &Uri, window: Window, count: i64, results: Vec<T>) -> Paginated<T> {
    let Window { limit, offset } = window;
    let next_offset = offset.saturating_add(limit);
    let next = (next_offset < count).then(|| {
        link(
            uri,
            &[
                ("limit", Some(limit.to_string())),
                ("offset", Some(next_offset.to_string())),
            ],
        )
    });
    let previous = (offset > 0).then(|| {
        let previous_offset = offset.saturating_sub(limit);
        let offset = (previous_offset > 0).then(|| previous_offset.to_string());
        link(uri, &[("limit", Some(limit.to_string())), ("offset", offset)])
    });
    Paginated {
        count,
        next,
        previous,
        results,
    }
}

/// Wrap a numbered page, rejecting pages past the last one
pub fn page_number_page<T>(
    uri: &Uri,
    page: i64,
    page_size: i64,
    count: i64,
    results: Vec<T>,
) -> Result<Paginated<T>, AppError> {
    let last_page = (count.saturating_add(page_size - 1) / page_size).max(1);
    if page > last_page {
        return Err(invalid_page_error());
    }
    let next = (page < last_page).then(|| link(uri, &[("page", Some((page + 1).to_string()))]));
    let previous = (page > 1).then(|| {
        let page = (page - 1 > 1).then(|| (page - 1).to_string());
        link(uri, &[("page", page)])
    });
    Ok(Paginated {
        count,
        next,
        previous,
        results,
    })
}

/// Rebuild `uri` with `params` replaced; a `None` value drops the parameter
fn link(uri: &Uri, params: &[(&str, Option<String>)]) -> String {
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !params.iter().any(|(name, _)| *name == key)
        })
        .map(str::to_string)
        .collect();
    for (name, value) in params {
        if let Some(value) = value {
            pairs.push(format!("{name}={}", urlencoding::encode(value)));
        }
    }
    if pairs.is_empty() {
        return uri.path().to_string();
    }
    format!("{}?{}", uri.path(), pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, offset: Option<&str>) -> PaginationParams {
        PaginationParams {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn limit_is_required_for_a_window() {
        assert_eq!(params(None, Some("4")).window(), None);
        assert_eq!(params(Some("0"), None).window(), None);
        assert_eq!(params(Some("abc"), None).window(), None);
        assert_eq!(
            params(Some("2"), Some("-3")).window(),
            Some(Window { limit: 2, offset: 0 })
        );
        assert_eq!(
            params(Some("2"), Some("4")).window(),
            Some(Window { limit: 2, offset: 4 })
        );
    }

    #[test]
    fn limit_offset_links() {
        let uri: Uri = "/api/v1/posts/?group=3&limit=2&offset=2".parse().unwrap();
        let page = limit_offset_page(&uri, Window { limit: 2, offset: 2 }, 5, vec![1, 2]);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/posts/?group=3&limit=2&offset=4")
        );
        assert_eq!(page.previous.as_deref(), Some("/api/v1/posts/?group=3&limit=2"));

        let last = limit_offset_page(&uri, Window { limit: 2, offset: 4 }, 5, vec![5]);
        assert_eq!(last.next, None);
        assert_eq!(
            last.previous.as_deref(),
            Some("/api/v1/posts/?group=3&limit=2&offset=2")
        );
    }

    #[test]
    fn page_number_links_and_bounds() {
        let uri: Uri = "/api/v1/groups/?page=2".parse().unwrap();
        let page = page_number_page(&uri, 2, 2, 5, vec!["c", "d"]).unwrap();
        assert_eq!(page.next.as_deref(), Some("/api/v1/groups/?page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/v1/groups/"));

        let error = page_number_page::<()>(&uri, 4, 2, 5, vec![]).unwrap_err();
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);

        assert!(page_number_page::<()>(&uri, 1, 2, 0, vec![]).is_ok());
    }

    #[test]
    fn invalid_page_numbers_are_rejected() {
        let params = |page: &str| PageParams {
            page: Some(page.to_string()),
        };
        assert!(params("0").window(10).is_err());
        assert!(params("abc").window(10).is_err());
        assert!(params(&i64::MAX.to_string()).window(10).is_err());
        assert_eq!(
            params("3").window(10).unwrap(),
            (3, Window { limit: 10, offset: 20 })
        );
        assert_eq!(
            PageParams::default().window(10).unwrap(),
            (1, Window { limit: 10, offset: 0 })
        );
    }

    #[test]
    fn huge_windows_do_not_overflow() {
        let uri: Uri = "/api/v1/posts/?limit=9223372036854775807&offset=1".parse().unwrap();
        let page = limit_offset_page(
            &uri,
            Window {
                limit: i64::MAX,
                offset: 1,
            },
            3,
            vec![2, 3],
        );
        assert_eq!(page.next, None);
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/posts/?limit=9223372036854775807")
        );

        let page = page_number_page::<()>(&uri, 1, i64::MAX, 3, vec![]).unwrap();
        assert_eq!(page.next, None);
    }
}
