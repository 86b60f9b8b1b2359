//! Notification content
//!
//! The recorder runs as a foreground service, so a persistent notification
//! is shown while a session is active. A second notification tells the user
//! how to grant the microphone permission when it is missing. Presentation is
//! left to the platform `Notifier`.

use serde::{Deserialize, Serialize};

pub const CHANNEL_ID: &str = "projection_recorder.notification.channel";
pub const CHANNEL_NAME: &str = "Screen recording";

pub const FOREGROUND_NOTIFICATION_ID: u32 = 1000;
pub const AUDIO_PERMISSION_NOTIFICATION_ID: u32 = 1001;

const APP_TITLE: &str = "Screen Recorder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Service,
    Status,
}

/// What happens when the user taps a notification or one of its actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    /// Bring the recorder UI to the front
    OpenApp,
    /// Open this app's page in system settings
    OpenAppSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub label: String,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    pub vibration: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u32,
    pub channel_id: String,
    pub title: String,
    pub text: String,
    pub content_target: Target,
    /// Cannot be swiped away
    pub ongoing: bool,
    pub category: Category,
    pub importance: Importance,
    pub visibility: Visibility,
    /// Show immediately instead of deferring foreground-service notices
    pub immediate: bool,
    pub only_alert_once: bool,
    /// Expandable long text
    pub big_text: bool,
    pub show_when: bool,
    pub actions: Vec<NotificationAction>,
}

/// Platform notification presenter
pub trait Notifier: Send + Sync {
    fn create_channel(&self, channel: &NotificationChannel);
    fn notify(&self, notification: &Notification);
    fn cancel(&self, id: u32);
}

pub fn recording_channel() -> NotificationChannel {
    NotificationChannel {
        id: CHANNEL_ID.to_string(),
        name: CHANNEL_NAME.to_string(),
        importance: Importance::Low,
        vibration: true,
    }
}

/// Persistent notification shown while recording
pub fn foreground_service_notification() -> Notification {
    Notification {
        id: FOREGROUND_NOTIFICATION_ID,
        channel_id: CHANNEL_ID.to_string(),
        title: APP_TITLE.to_string(),
        text: "Screen recording...".to_string(),
        content_target: Target::OpenApp,
        ongoing: true,
        category: Category::Service,
        importance: Importance::Low,
        visibility: Visibility::Private,
        immediate: true,
        only_alert_once: false,
        big_text: false,
        show_when: true,
        actions: Vec::new(),
    }
}

/// Remediation shown when the microphone permission is missing
pub fn audio_permission_required_notification() -> Notification {
    Notification {
        id: AUDIO_PERMISSION_NOTIFICATION_ID,
        channel_id: CHANNEL_ID.to_string(),
        title: APP_TITLE.to_string(),
        text: "Audio permission is required. Please enable it in system settings or reopen the app \
               and enable the permission before starting a recording."
            .to_string(),
        content_target: Target::OpenApp,
        ongoing: false,
        category: Category::Service,
        importance: Importance::Low,
        visibility: Visibility::Private,
        immediate: false,
        only_alert_once: true,
        big_text: true,
        show_when: true,
        actions: vec![NotificationAction {
            label: "Settings".to_string(),
            target: Target::OpenAppSettings,
        }],
    }
}
