use anyhow::{Result, anyhow};
use snapline_application::{ProfileTab, ProfileTabLoader};
use snapline_core::api::ProfileTarget;
use snapline_core::model::UserId;
use snapline_infrastructure::load_image;
use std::path::Path;

use super::{App, render};

pub async fn show(app: &App, user_id: Option<UserId>, tab: ProfileTab) -> Result<()> {
    app.require_session()?;
    let target = user_id.map_or(ProfileTarget::Own, ProfileTarget::User);
    let loader = ProfileTabLoader::new(app.api.clone(), app.session.clone());
    loader.open(target).await?;
    loader.select_tab(tab).await?;

    let view = loader.view();
    if let Some(summary) = &view.summary {
        render::profile(summary);
    }
    println!();

    match tab {
        ProfileTab::Posts => {
            let posts = view.posts.unwrap_or_default();
            if posts.is_empty() {
                println!("No posts yet");
            }
            for post in &posts {
                render::post(post);
            }
        }
        ProfileTab::Followers | ProfileTab::Following => {
            let users = match tab {
                ProfileTab::Followers => view.followers,
                _ => view.following,
            }
            .unwrap_or_default();
            if users.is_empty() {
                println!("Nobody here yet");
            }
            for user in &users {
                println!("{}", render::user_line(user));
            }
        }
    }
    Ok(())
}

pub async fn update(app: &App, bio: &str, picture: Option<&Path>) -> Result<()> {
    app.require_session()?;
    let picture = picture.map(load_image).transpose()?;

    let loader = ProfileTabLoader::new(app.api.clone(), app.session.clone());
    loader
        .update_profile(bio, picture)
        .await
        .map_err(|e| anyhow!(e.user_message("Failed to update profile")))?;

    let user = app.require_session()?;
    println!("✅ Profile updated");
    render::profile(&user);
    Ok(())
}
