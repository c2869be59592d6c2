//! Share target: other applications POST a form to the share endpoint, the
//! content is relayed to an open context and the sharer is sent to `/`.

use super::clients::{ClientMessage, Clients};
use super::http::{Request, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use url::form_urlencoded;

pub const DEFAULT_SHARED_TITLE: &str = "Shared Note";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedContent {
    pub title: String,
    pub text: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

impl SharedContent {
    /// Decode an `application/x-www-form-urlencoded` body. Missing or empty
    /// fields take their defaults.
    pub fn from_form(body: &[u8]) -> Self {
        let mut title = String::new();
        let mut text = String::new();
        let mut url = String::new();
        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "title" => title = value.into_owned(),
                "text" => text = value.into_owned(),
                "url" => url = value.into_owned(),
                _ => {}
            }
        }
        if title.is_empty() {
            title = DEFAULT_SHARED_TITLE.to_string();
        }
        Self {
            title,
            text,
            url,
            timestamp: Utc::now(),
        }
    }
}

/// Relay the shared content to the first open context. Always answers with
/// a 302 to `/`.
pub fn handle(clients: &Clients, request: &Request) -> Response {
    let shared = SharedContent::from_form(&request.body);
    let title = shared.title.clone();
    match clients.post_first(ClientMessage::SharedContent(shared)) {
        Some(client) => info!(?client, %title, "Relayed shared content"),
        None => warn!(%title, "Shared content received with no open client"),
    }
    Response::redirect("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn share_request(body: &str) -> Request {
        Request::post(Url::parse("http://localhost:3000/share").unwrap(), body)
    }

    #[test]
    fn test_from_form_decodes_fields() {
        let shared = SharedContent::from_form(b"title=Hello+there&text=a%26b&url=https%3A%2F%2Fx.io");
        assert_eq!(shared.title, "Hello there");
        assert_eq!(shared.text, "a&b");
        assert_eq!(shared.url, "https://x.io");
    }

    #[test]
    fn test_from_form_defaults() {
        let shared = SharedContent::from_form(b"title=&text=only");
        assert_eq!(shared.title, DEFAULT_SHARED_TITLE);
        assert_eq!(shared.text, "only");
        assert_eq!(shared.url, "");
    }

    #[test]
    fn test_handle_relays_and_redirects() {
        let clients = Clients::new();
        let (_id, mut rx) = clients.register();

        let response = handle(&clients, &share_request("title=T&text=body"));

        assert_eq!(response.status.as_u16(), 302);
        assert_eq!(response.header("location"), Some("/"));
        match rx.try_recv().unwrap() {
            ClientMessage::SharedContent(shared) => {
                assert_eq!(shared.title, "T");
                assert_eq!(shared.text, "body");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_handle_redirects_without_clients_or_valid_body() {
        let clients = Clients::new();
        let response = handle(&clients, &share_request("%%%not-a-form"));
        assert_eq!(response.status.as_u16(), 302);
        assert_eq!(response.header("location"), Some("/"));
    }
}
