use super::clients::{ClientId, Clients};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

pub const NOTIFICATION_TITLE: &str = "SideNotes";
pub const DEFAULT_BODY: &str = "New update available";
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub date_of_arrival: DateTime<Utc>,
    pub primary_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn from_push(payload: Option<&str>) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: payload.unwrap_or(DEFAULT_BODY).to_string(),
            icon: "/images/icon-192x192.png".to_string(),
            badge: "/images/badge-72x72.png".to_string(),
            vibrate: vec![100, 50, 100],
            data: NotificationData {
                date_of_arrival: Utc::now(),
                primary_key: "1".to_string(),
            },
            actions: vec![
                NotificationAction {
                    action: "explore".to_string(),
                    title: "Open SideNotes".to_string(),
                    icon: "/images/checkmark.png".to_string(),
                },
                NotificationAction {
                    action: "close".to_string(),
                    title: "Close".to_string(),
                    icon: "/images/xmark.png".to_string(),
                },
            ],
        }
    }
}

/// Whatever displays notifications to the user.
pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: Notification);
}

pub fn on_push(sink: &dyn NotificationSink, payload: Option<&str>) {
    debug!(has_payload = payload.is_some(), "Push message received");
    sink.show(Notification::from_push(payload));
}

/// `explore` opens the application root; every other action just closes.
pub fn on_notification_click(clients: &Clients, action: &str) -> Option<ClientId> {
    debug!(action, "Notification click");
    if action == "explore" {
        clients.open_window("/")
    } else {
        None
    }
}

/// Returns whether the tag is recognized.
pub fn on_sync(tag: &str) -> bool {
    if tag == BACKGROUND_SYNC_TAG {
        info!(tag, "Background sync completed");
        true
    } else {
        debug!(tag, "Ignoring unknown sync tag");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clients::ClientMessage;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<Notification>>);

    impl NotificationSink for RecordingSink {
        fn show(&self, notification: Notification) {
            self.0.lock().unwrap().push(notification);
        }
    }

    #[test]
    fn test_push_with_and_without_payload() {
        let sink = RecordingSink::default();
        on_push(&sink, Some("3 notes synced"));
        on_push(&sink, None);

        let shown = sink.0.lock().unwrap();
        assert_eq!(shown[0].title, "SideNotes");
        assert_eq!(shown[0].body, "3 notes synced");
        assert_eq!(shown[1].body, DEFAULT_BODY);
        let actions: Vec<&str> = shown[1].actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["explore", "close"]);
    }

    #[test]
    fn test_explore_click_opens_root() {
        let clients = Clients::new();
        let (id, mut rx) = clients.register();

        assert_eq!(on_notification_click(&clients, "explore"), Some(id));
        assert_eq!(rx.try_recv().unwrap(), ClientMessage::OpenWindow("/".into()));
    }

    #[test]
    fn test_close_click_does_nothing() {
        let clients = Clients::new();
        let (_id, mut rx) = clients.register();

        assert_eq!(on_notification_click(&clients, "close"), None);
        assert!(rx.try_recv().is_err());
        assert!(clients.take_window_requests().is_empty());
    }

    #[test]
    fn test_sync_tags() {
        assert!(on_sync("background-sync"));
        assert!(!on_sync("something-else"));
    }
}
