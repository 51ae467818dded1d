//! Widget constructor contract.
//!
//! [`WidgetOptions`] serializes to the options object the conferencing
//! widget constructor expects. [`WidgetLibrary`] and [`WidgetHandle`] stand in
//! for the library's global constructor and the live session it returns.

use crate::config::BootstrapConfig;
use crate::errors::BootstrapError;
use crate::sanitize::sanitize_room_name;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Buttons shown in the widget toolbar.
pub const TOOLBAR_BUTTONS: [&str; 27] = [
    "microphone",
    "camera",
    "closedcaptions",
    "desktop",
    "fullscreen",
    "fodeviceselection",
    "hangup",
    "profile",
    "chat",
    "recording",
    "livestreaming",
    "etherpad",
    "sharedvideo",
    "settings",
    "raisehand",
    "videoquality",
    "filmstrip",
    "invite",
    "feedback",
    "stats",
    "shortcuts",
    "tileview",
    "videobackgroundblur",
    "download",
    "help",
    "mute-everyone",
    "security",
];

/// Application name shown inside the widget.
pub const APP_NAME: &str = "Video Meeting";

/// Identifier of the element the widget renders into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContainerId(pub String);

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conference behavior overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ConfigOverwrite {
    pub start_with_audio_muted: bool,
    pub start_with_video_muted: bool,
    pub prejoin_page_enabled: bool,
    pub disable_deep_linking: bool,
}

impl Default for ConfigOverwrite {
    fn default() -> Self {
        Self {
            start_with_audio_muted: true,
            start_with_video_muted: true,
            prejoin_page_enabled: false,
            disable_deep_linking: true,
        }
    }
}

/// Interface overrides. Keys use the widget's upper-case naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(clippy::struct_excessive_bools)]
pub struct InterfaceConfigOverwrite {
    pub show_jitsi_watermark: bool,
    pub show_watermark_for_guests: bool,
    pub mobile_app_promo: bool,
    pub app_name: String,
    pub disable_join_leave_notifications: bool,
    pub toolbar_buttons: Vec<String>,
}

impl Default for InterfaceConfigOverwrite {
    fn default() -> Self {
        Self {
            show_jitsi_watermark: false,
            show_watermark_for_guests: false,
            mobile_app_promo: false,
            app_name: APP_NAME.to_string(),
            disable_join_leave_notifications: true,
            toolbar_buttons: TOOLBAR_BUTTONS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub display_name: String,
}

/// Options passed to the widget constructor.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    /// Sanitized room name.
    pub room_name: String,
    pub jwt: String,
    pub width: String,
    pub height: String,
    pub parent_node: ContainerId,
    pub config_overwrite: ConfigOverwrite,
    pub interface_config_overwrite: InterfaceConfigOverwrite,
    pub user_info: UserInfo,
}

impl fmt::Debug for WidgetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetOptions")
            .field("room_name", &self.room_name)
            .field("jwt", &"[REDACTED]")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("parent_node", &self.parent_node)
            .field("user_info", &self.user_info)
            .finish_non_exhaustive()
    }
}

impl WidgetOptions {
    /// Build constructor options for `room_name`, sanitizing it.
    pub fn new(
        room_name: &str,
        jwt: String,
        parent_node: ContainerId,
        config: &BootstrapConfig,
    ) -> Self {
        Self {
            room_name: sanitize_room_name(room_name),
            jwt,
            width: config.width.clone(),
            height: config.height.clone(),
            parent_node,
            config_overwrite: ConfigOverwrite::default(),
            interface_config_overwrite: InterfaceConfigOverwrite::default(),
            user_info: UserInfo {
                display_name: config.display_name.clone(),
            },
        }
    }
}

/// Events emitted by a live widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    ReadyToClose,
    VideoConferenceJoined,
    ParticipantJoined(serde_json::Value),
    Error(serde_json::Value),
}

/// Callback receiving every widget event.
pub type EventListener = Arc<dyn Fn(WidgetEvent) + Send + Sync>;

/// A constructed widget session.
pub trait WidgetHandle: Send + Sync {
    /// Register the listener for ready-to-close, conference-joined,
    /// participant-joined and error events.
    fn add_event_listeners(&self, listener: EventListener);

    /// Tear the widget down.
    fn dispose(&self);
}

/// The loaded widget library's constructor.
pub trait WidgetLibrary: Send + Sync {
    /// Construct a widget in `options.parent_node`.
    ///
    /// # Errors
    ///
    /// `BootstrapError::Widget` when construction fails.
    fn create_session(
        &self,
        domain: &str,
        options: WidgetOptions,
    ) -> Result<Box<dyn WidgetHandle>, BootstrapError>;
}

/// Listener that logs each event for `room_name`.
///
/// Error events are logged only; they do not end the session.
pub fn logging_listener(room_name: &str) -> EventListener {
    let room_name = room_name.to_string();
    Arc::new(move |event| match event {
        WidgetEvent::ReadyToClose => {
            info!(target: "session.widget", room = %room_name, "Meeting closed");
        }
        WidgetEvent::VideoConferenceJoined => {
            info!(target: "session.widget", room = %room_name, "Joined video conference");
        }
        WidgetEvent::ParticipantJoined(participant) => {
            info!(
                target: "session.widget",
                room = %room_name,
                participant = %participant,
                "Participant joined"
            );
        }
        WidgetEvent::Error(details) => {
            error!(target: "session.widget", room = %room_name, error = %details, "Widget error");
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> WidgetOptions {
        WidgetOptions::new(
            "team sync!",
            "header.payload.signature".to_string(),
            ContainerId::from("meeting-container"),
            &BootstrapConfig::default(),
        )
    }

    #[test]
    fn test_room_name_is_sanitized() {
        assert_eq!(options().room_name, "team_sync_");
    }

    #[test]
    fn test_options_serialize_to_constructor_contract() {
        let value = serde_json::to_value(options()).unwrap();

        assert_eq!(value["roomName"], "team_sync_");
        assert_eq!(value["jwt"], "header.payload.signature");
        assert_eq!(value["width"], "100%");
        assert_eq!(value["height"], "100%");
        assert_eq!(value["parentNode"], "meeting-container");
        assert_eq!(
            value["configOverwrite"],
            json!({
                "startWithAudioMuted": true,
                "startWithVideoMuted": true,
                "prejoinPageEnabled": false,
                "disableDeepLinking": true
            })
        );
        assert_eq!(value["userInfo"], json!({"displayName": "Meeting Participant"}));
    }

    #[test]
    fn test_interface_overwrite_keys() {
        let value = serde_json::to_value(InterfaceConfigOverwrite::default()).unwrap();

        assert_eq!(value["SHOW_JITSI_WATERMARK"], false);
        assert_eq!(value["SHOW_WATERMARK_FOR_GUESTS"], false);
        assert_eq!(value["MOBILE_APP_PROMO"], false);
        assert_eq!(value["APP_NAME"], "Video Meeting");
        assert_eq!(value["DISABLE_JOIN_LEAVE_NOTIFICATIONS"], true);

        let buttons = value["TOOLBAR_BUTTONS"].as_array().unwrap();
        assert_eq!(buttons.len(), 27);
        assert_eq!(buttons.first().unwrap(), "microphone");
        assert_eq!(buttons.last().unwrap(), "security");
    }

    #[test]
    fn test_debug_redacts_jwt() {
        let debug = format!("{:?}", options());
        assert!(!debug.contains("header.payload.signature"));
        assert!(debug.contains("team_sync_"));
    }

    #[test]
    fn test_logging_listener_accepts_all_events() {
        let listener = logging_listener("standup");
        listener(WidgetEvent::ReadyToClose);
        listener(WidgetEvent::VideoConferenceJoined);
        listener(WidgetEvent::ParticipantJoined(json!({"id": "abc"})));
        listener(WidgetEvent::Error(json!({"name": "conference.failed"})));
    }
}
