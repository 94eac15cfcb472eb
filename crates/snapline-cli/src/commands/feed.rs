use anyhow::{Result, anyhow};
use snapline_application::FeedController;
use snapline_core::model::{FeedMode, PostId, UserId};

use super::{App, render};

fn controller(app: &App) -> Result<FeedController> {
    app.require_session()?;
    Ok(FeedController::new(app.api.clone(), app.session.clone()))
}

pub async fn show(app: &App, explore: bool) -> Result<()> {
    let feed = controller(app)?;
    let mode = if explore {
        FeedMode::Explore
    } else {
        FeedMode::Following
    };
    feed.load(mode).await?;

    let view = feed.view();
    if let Some(empty) = view.empty_state() {
        println!("{}", empty.message());
        return Ok(());
    }
    for post in &view.items {
        render::post(post);
    }
    Ok(())
}

pub async fn like(app: &App, post_id: PostId) -> Result<()> {
    let feed = controller(app)?;
    feed.like(post_id).await?;
    match feed.view().items.iter().find(|p| p.id == post_id) {
        Some(post) => render::post(post),
        None => println!("Toggled like on post #{}", post_id),
    }
    Ok(())
}

pub async fn comment(app: &App, post_id: PostId, text: &str) -> Result<()> {
    let feed = controller(app)?;
    let comment = feed
        .comment(post_id, text)
        .await
        .map_err(|e| anyhow!(e.user_message("Failed to add comment")))?;
    println!("💬 Comment #{} added to post #{}", comment.id, post_id);
    Ok(())
}

pub async fn follow(app: &App, user_id: UserId, follow: bool) -> Result<()> {
    let feed = controller(app)?;
    if follow {
        feed.follow(user_id).await?;
        println!("Following user #{}", user_id);
    } else {
        feed.unfollow(user_id).await?;
        println!("Unfollowed user #{}", user_id);
    }
    Ok(())
}
