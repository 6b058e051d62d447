//! Linked pagination engine.
//!
//! A collection endpoint answers with one page of items plus, optionally,
//! the URL of the following page. Resource crates describe how to find the
//! items and the next link by implementing [`Page`]; [`Pager`] drives the
//! fetching. Pages are requested one at a time as the caller advances, so
//! dropping a [`Pages`] sequence mid-way leaves nothing running.

use crate::client::{RequestOpts, ServiceClient};
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// One fetched page, before any resource-specific decoding.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// URL the page was fetched from
    pub url: String,
    /// Status code of the page response
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed response body
    pub body: Value,
}

/// A typed page understood by [`Pager`].
pub trait Page: Sized {
    /// Element type carried by the page.
    type Item: DeserializeOwned;

    /// Decode the items on this page.
    fn items(&self) -> Result<Vec<Self::Item>>;

    /// URL of the following page, `None` on the last page.
    fn next_page_url(&self) -> Result<Option<String>>;

    /// An empty page ends iteration without being yielded.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.items()?.is_empty())
    }
}

#[derive(Deserialize)]
struct Link {
    href: String,
    rel: String,
}

/// Helpers shared by pages that embed their next link in the body.
#[derive(Debug, Clone)]
pub struct LinkedPageBase {
    /// The raw page
    pub result: PageResult,
}

impl LinkedPageBase {
    /// Wrap a fetched page.
    #[must_use]
    pub const fn new(result: PageResult) -> Self {
        Self { result }
    }

    /// Next URL from a `[{"href": .., "rel": "next"}]` list stored under `key`.
    pub fn next_url_from_links(&self, key: &str) -> Result<Option<String>> {
        let links = match self.result.body.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(links) => links,
        };
        let links: Vec<Link> = serde_json::from_value(links.clone())
            .map_err(|err| Error::DecodeError(format!("Malformed `{key}`: {err}")))?;

        Ok(links
            .into_iter()
            .find(|link| link.rel == "next")
            .map(|link| link.href)
            .filter(|href| !href.is_empty()))
    }

    /// Decode the array stored under `key`.
    pub fn items_at<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let items = self
            .result
            .body
            .get(key)
            .ok_or_else(|| Error::DecodeError(format!("Page is missing key `{key}`")))?;
        serde_json::from_value(items.clone())
            .map_err(|err| Error::DecodeError(format!("Failed to decode `{key}`: {err}")))
    }
}

/// Lazy, restartable handle on a paginated collection.
///
/// Nothing is fetched until [`Pager::pages`] is advanced. Each call to
/// [`Pager::pages`] starts over from the first page.
pub struct Pager<P> {
    client: ServiceClient,
    start: std::result::Result<String, Error>,
    create_page: fn(PageResult) -> P,
}

impl<P: Page> Pager<P> {
    /// Pager starting at `initial_url`.
    #[must_use]
    pub fn new(
        client: &ServiceClient,
        initial_url: impl Into<String>,
        create_page: fn(PageResult) -> P,
    ) -> Self {
        Self {
            client: client.clone(),
            start: Ok(initial_url.into()),
            create_page,
        }
    }

    /// Pager that failed before any request could be made.
    #[must_use]
    pub fn from_error(client: &ServiceClient, err: Error, create_page: fn(PageResult) -> P) -> Self {
        Self {
            client: client.clone(),
            start: Err(err),
            create_page,
        }
    }

    /// The error that prevented the pager from starting, if any.
    #[must_use]
    pub fn err(&self) -> Option<&Error> {
        self.start.as_ref().err()
    }

    /// URL of the first page.
    #[must_use]
    pub fn initial_url(&self) -> Option<&str> {
        self.start.as_deref().ok()
    }

    /// Start a fresh forward-only sequence of pages.
    #[must_use]
    pub fn pages(&self) -> Pages<P> {
        let (next_url, pending_err) = match &self.start {
            Ok(url) => (Some(url.clone()), None),
            Err(err) => (None, Some(err.clone())),
        };
        Pages {
            client: self.client.clone(),
            next_url,
            pending_err,
            create_page: self.create_page,
        }
    }

    /// Visit pages in order until `visit` returns `false` or the last page.
    pub async fn each_page<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&P) -> Result<bool>,
    {
        let mut pages = self.pages();
        while let Some(page) = pages.next_page().await {
            if !visit(&page?)? {
                break;
            }
        }
        Ok(())
    }

    /// Fetch every page.
    pub async fn all_pages(&self) -> Result<Vec<P>> {
        let mut pages = self.pages();
        let mut collected = Vec::new();
        while let Some(page) = pages.next_page().await {
            collected.push(page?);
        }
        Ok(collected)
    }

    /// Fetch every page and decode all items.
    pub async fn all_items(&self) -> Result<Vec<P::Item>> {
        let mut pages = self.pages();
        let mut items = Vec::new();
        while let Some(page) = pages.next_page().await {
            items.extend(page?.items()?);
        }
        Ok(items)
    }
}

/// Forward-only sequence of pages produced by [`Pager::pages`].
pub struct Pages<P> {
    client: ServiceClient,
    next_url: Option<String>,
    pending_err: Option<Error>,
    create_page: fn(PageResult) -> P,
}

impl<P: Page> Pages<P> {
    /// Fetch the next page. Returns `None` once the sequence is exhausted.
    ///
    /// After an error the sequence is over.
    pub async fn next_page(&mut self) -> Option<Result<P>> {
        if let Some(err) = self.pending_err.take() {
            return Some(Err(err));
        }
        let url = self.next_url.take()?;

        let response = match self.client.get(&url, RequestOpts::new()).await {
            Ok(response) => response,
            Err(err) => return Some(Err(err)),
        };
        let Some(body) = response.body else {
            return Some(Err(Error::DecodeError(format!("Page at `{url}` has no body"))));
        };

        let page = (self.create_page)(PageResult {
            url,
            status: response.status,
            headers: response.headers,
            body,
        });

        match page.is_empty() {
            Ok(true) => return None,
            Ok(false) => {}
            Err(err) => return Some(Err(err)),
        }
        match page.next_page_url() {
            Ok(next) => self.next_url = next,
            Err(err) => return Some(Err(err)),
        }
        Some(Ok(page))
    }
}
