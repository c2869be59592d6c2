//! Request and response values handled by the router.
//!
//! These are plain owned values (no streaming bodies) so a response can be
//! cloned into a partition and handed back to the caller at the same time.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use url::Url;

/// What the requester intends to do with the response. Only `Document`
/// changes router behavior (it gets the HTML offline page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Script,
    Style,
    Image,
    Font,
    Manifest,
    #[default]
    Other,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            destination: Destination::Other,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url, body: impl Into<Vec<u8>>) -> Self {
        let mut request = Self::new(Method::POST, url);
        request.body = body.into();
        request
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// The key a response for this request is stored under.
    pub fn cache_key(&self) -> String {
        cache_key(&self.url)
    }
}

/// URL without its fragment.
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        let mut response = Self::ok(body);
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        response
    }

    pub fn redirect(location: &'static str) -> Self {
        let mut response = Self::new(StatusCode::FOUND, Vec::new());
        response
            .headers
            .insert(LOCATION, HeaderValue::from_static(location));
        response
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_drops_fragment() {
        let url = Url::parse("http://localhost:3000/static/app.css?v=2#top").unwrap();
        assert_eq!(cache_key(&url), "http://localhost:3000/static/app.css?v=2");
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = Response::redirect("/");
        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(response.header("location"), Some("/"));
    }

    #[test]
    fn test_html_content_type() {
        let response = Response::html("<p>hi</p>");
        assert!(response.is_success());
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.status_text(), "OK");
    }
}
