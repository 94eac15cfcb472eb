use anyhow::{Result, anyhow};
use chrono::Utc;
use snapline_application::content_publisher::{CREATE_POST_FAILED, CREATE_STORY_FAILED};
use snapline_application::{ContentPublisher, StoryTray};
use snapline_infrastructure::load_image;
use std::path::Path;

use super::{App, render};

pub async fn stories(app: &App, all: bool) -> Result<()> {
    app.require_session()?;
    let tray = StoryTray::new(app.api.clone(), app.session.clone());
    tray.load().await?;

    let now = Utc::now();
    let shown = if all { tray.stories() } else { tray.active(now) };
    if shown.is_empty() {
        println!("No stories right now");
    }
    for story in &shown {
        render::story(story, now);
    }
    Ok(())
}

pub async fn post(app: &App, image: &Path, caption: &str) -> Result<()> {
    app.require_session()?;
    let image = load_image(image)?;
    let publisher = ContentPublisher::new(app.api.clone(), app.session.clone());
    publisher
        .create_post(Some(image), caption)
        .await
        .map_err(|e| anyhow!(e.user_message(CREATE_POST_FAILED)))?;
    println!("✅ Post published");
    Ok(())
}

pub async fn story(app: &App, image: &Path, text: &str) -> Result<()> {
    app.require_session()?;
    let image = load_image(image)?;
    let publisher = ContentPublisher::new(app.api.clone(), app.session.clone());
    publisher
        .create_story(Some(image), text)
        .await
        .map_err(|e| anyhow!(e.user_message(CREATE_STORY_FAILED)))?;
    println!("✅ Story published");
    Ok(())
}
