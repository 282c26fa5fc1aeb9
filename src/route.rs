/// Addressable UI state: which view, filter, page and open notification.
///
/// Serializes to the same `/views/{slug}?query=..&page=..&id=..` shape the
/// server uses in `navigate` events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub view: String,
    pub query: Option<String>,
    pub page: u32,
    pub detail: Option<String>,
}

impl Route {
    pub fn new(view: &str) -> Self {
        Self {
            view: view.to_string(),
            query: None,
            page: 1,
            detail: None,
        }
    }

    pub fn to_url(&self) -> String {
        let mut url = format!("/views/{}", urlencoding::encode(&self.view));
        let mut params = Vec::new();
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            params.push(format!("query={}", urlencoding::encode(q)));
        }
        if self.page > 1 {
            params.push(format!("page={}", self.page));
        }
        if let Some(id) = &self.detail {
            params.push(format!("id={}", urlencoding::encode(id)));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// Parse an absolute URL or a path. Returns `None` for paths outside
    /// `/views/`.
    pub fn parse(url: &str) -> Option<Route> {
        let path_and_query = match url.find("://") {
            Some(scheme_end) => {
                let rest = &url[scheme_end + 3..];
                &rest[rest.find('/')?..]
            }
            None => url,
        };
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path_and_query, None),
        };
        let slug = path.trim_end_matches('/').strip_prefix("/views/")?;
        if slug.is_empty() || slug.contains('/') {
            return None;
        }

        let mut route = Route::new(&decode(slug));
        for pair in query.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(value);
            match key {
                "query" => route.query = Some(value),
                "page" => route.page = value.parse().unwrap_or(1).max(1),
                "id" if !value.is_empty() => route.detail = Some(value),
                _ => {}
            }
        }
        Some(route)
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|c| c.into_owned())
        .unwrap_or(s)
}

/// Back-stack of routes, the terminal stand-in for browser history
#[derive(Debug, Default)]
pub struct RouteHistory {
    entries: Vec<Route>,
}

impl RouteHistory {
    pub fn current(&self) -> Option<&Route> {
        self.entries.last()
    }

    /// New history entry (page navigation, view switch)
    pub fn push(&mut self, route: Route) {
        if self.entries.last() != Some(&route) {
            self.entries.push(route);
        }
    }

    /// Replace the current entry without growing history (detail open/close,
    /// query sync)
    pub fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(last) => *last = route,
            None => self.entries.push(route),
        }
    }

    /// Drop the current entry and return the one before it
    pub fn back(&mut self) -> Option<Route> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.entries.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_only_non_default_params() {
        assert_eq!(Route::new("inbox").to_url(), "/views/inbox");
        let route = Route {
            view: "inbox".into(),
            query: Some("repo:cli/cli is:unread".into()),
            page: 2,
            detail: Some("123".into()),
        };
        assert_eq!(
            route.to_url(),
            "/views/inbox?query=repo%3Acli%2Fcli%20is%3Aunread&page=2&id=123"
        );
    }

    #[test]
    fn parses_absolute_navigate_url() {
        let route = Route::parse("http://localhost:8808/views/starred?id=99&page=3").unwrap();
        assert_eq!(route.view, "starred");
        assert_eq!(route.page, 3);
        assert_eq!(route.detail.as_deref(), Some("99"));
        assert_eq!(route.query, None);
    }

    #[test]
    fn parse_inverts_format() {
        let route = Route {
            view: "my view".into(),
            query: Some("author:me".into()),
            page: 1,
            detail: None,
        };
        assert_eq!(Route::parse(&route.to_url()), Some(route));
    }

    #[test]
    fn rejects_non_view_paths() {
        assert_eq!(Route::parse("/settings"), None);
        assert_eq!(Route::parse("http://host"), None);
    }

    #[test]
    fn history_back_returns_previous() {
        let mut history = RouteHistory::default();
        history.push(Route::new("inbox"));
        let mut page2 = Route::new("inbox");
        page2.page = 2;
        history.push(page2.clone());
        history.push(page2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.back(), Some(Route::new("inbox")));
        assert_eq!(history.back(), None);
    }
}
