//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] pagination fields.

use std::borrow::Cow;

use url::{form_urlencoded, Url};

/// Trait implemented by all query builders. Provides the address (query
/// string) serialization boundary and shared pagination builder methods.
pub trait Query {
    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Key/value pairs written to the address, in order. Defaults are omitted.
    fn to_pairs(&self) -> Vec<(&'static str, String)>;

    /// Rebuilds a query from address pairs. Unknown keys are ignored and
    /// unparsable values fall back to their defaults.
    fn from_pairs<'a, I>(pairs: I) -> Self
    where
        Self: Sized,
        I: Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let pairs = self.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    /// Reads a query back out of a URL's query string.
    fn from_url(url: &Url) -> Self
    where
        Self: Sized,
    {
        Self::from_pairs(url.query_pairs())
    }

    /// Serializes to a bare `key=value&...` string (no leading `?`).
    fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.to_pairs());
        serializer.finish()
    }

    /// Parses a bare query string; a leading `?` is accepted.
    fn from_query_string(query: &str) -> Self
    where
        Self: Sized,
    {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page;
        self
    }

    /// Sets the number of results per page.
    fn with_page_size(mut self, page_size: usize) -> Self
    where
        Self: Sized,
    {
        self.get_common().page_size = Some(page_size);
        self
    }
}

/// Pagination fields shared by all query types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryCommon {
    /// Page number (1-indexed). Defaults to 1.
    pub page: u32,
    /// Results per page. `None` uses the source's default.
    pub page_size: Option<usize>,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            page: 1,
            page_size: None,
        }
    }
}

impl QueryCommon {
    /// Address pairs for the pagination fields. Page 1 is implicit.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page != 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        pairs
    }

    /// Applies a single address pair, returning `false` if the key is not a
    /// pagination key.
    pub fn apply_pair(&mut self, key: &str, value: &str) -> bool {
        match key {
            "page" => {
                self.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1);
                true
            }
            "pageSize" => {
                self.page_size = value.parse().ok().filter(|s| *s >= 1);
                true
            }
            _ => false,
        }
    }
}
