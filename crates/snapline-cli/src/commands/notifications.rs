use anyhow::Result;
use snapline_application::NotificationPoller;
use snapline_core::model::{NotificationId, SessionStatus};
use std::sync::Arc;
use std::time::Duration;

use super::{App, render};

fn poller(app: &App) -> NotificationPoller {
    NotificationPoller::new(app.api.clone(), app.session.clone(), app.config.poll_interval())
}

pub async fn list(app: &App, read: Option<NotificationId>, all: bool) -> Result<()> {
    app.require_session()?;
    let poller = poller(app);
    poller.refresh().await?;

    if let Some(id) = read {
        poller.mark_read(id).await?;
    }
    if all {
        poller.mark_all_read().await?;
    }

    let notifications = poller.notifications();
    if notifications.is_empty() {
        println!("No notifications yet");
        return Ok(());
    }
    println!("🔔 {} unread", poller.unread());
    for notification in &notifications {
        render::notification(notification);
    }
    Ok(())
}

/// Polls for as long as the session lasts, printing the badge on change.
pub async fn watch(app: &App) -> Result<()> {
    app.require_session()?;
    let poller = Arc::new(poller(app));
    poller.spawn_lifecycle();
    println!(
        "Watching notifications every {}s (Ctrl-C to stop)",
        app.config.poll_interval().as_secs()
    );

    let mut status_rx = app.session.subscribe();
    let mut last_unread = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = status_rx.changed() => {
                if changed.is_err() || *status_rx.borrow_and_update() != SessionStatus::Authenticated {
                    println!("Session ended");
                    break;
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(500)) => {
                let unread = poller.unread();
                if last_unread != Some(unread) {
                    println!("🔔 {} unread", unread);
                    last_unread = Some(unread);
                }
            }
        }
    }

    poller.shutdown();
    Ok(())
}
