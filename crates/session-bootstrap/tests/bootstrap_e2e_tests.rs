//! Bootstrap flow against a real meeting service.
//!
//! The widget library is mocked; credentials come from the service over HTTP.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use common::jwt::peek_claims;
use meeting_test_utils::{test_secrets, TestMeetingServer};
use session_bootstrap::errors::CREDENTIAL_FAILURE_MESSAGE;
use session_bootstrap::mock::{MockLibraryLoader, MockWidgetLibrary};
use session_bootstrap::{
    BootstrapConfig, ContainerId, HttpCredentialSource, MeetingView, SessionState,
    WidgetLibraryCache,
};
use std::sync::Arc;

fn library_for(widgets: Arc<MockWidgetLibrary>) -> Arc<WidgetLibraryCache> {
    Arc::new(WidgetLibraryCache::new(
        Arc::new(MockLibraryLoader::loading(widgets)),
        BootstrapConfig::default().script_url,
    ))
}

#[tokio::test]
async fn test_room_is_sanitized_for_widget_but_not_in_credential() -> Result<()> {
    let server = TestMeetingServer::spawn_with_secrets(test_secrets()).await?;
    let widgets = Arc::new(MockWidgetLibrary::new());

    let mut view = MeetingView::new(
        BootstrapConfig::default(),
        Arc::new(HttpCredentialSource::new(&server.url())?),
        library_for(widgets.clone()),
    );

    view.mount("team sync!", ContainerId::from("meeting-container"))
        .await;
    assert_eq!(view.settled().await, SessionState::Live);

    let (_, options) = widgets.constructed().pop().unwrap();
    assert_eq!(options.room_name, "team_sync_");
    assert_eq!(peek_claims(&options.jwt)?.room, "team sync!");

    view.unmount().await;
    assert_eq!(widgets.handles().pop().unwrap().dispose_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unconfigured_service_fails_with_token_message() -> Result<()> {
    let server = TestMeetingServer::spawn().await?;
    let widgets = Arc::new(MockWidgetLibrary::new());

    let mut view = MeetingView::new(
        BootstrapConfig::default(),
        Arc::new(HttpCredentialSource::new(&server.url())?),
        library_for(widgets.clone()),
    );

    view.mount("standup", ContainerId::from("meeting-container"))
        .await;

    assert_eq!(
        view.settled().await,
        SessionState::Failed(CREDENTIAL_FAILURE_MESSAGE.to_string())
    );
    assert_eq!(widgets.created_count(), 0);

    Ok(())
}
