//! Plain-text rendering of domain models.

use chrono::{DateTime, Utc};
use snapline_core::model::{Notification, Post, Story, UserSummary};

fn when(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn user_line(user: &UserSummary) -> String {
    let following = if user.is_following { "  [following]" } else { "" };
    format!("#{:<5} @{} ({}){}", user.id, user.username, user.display_name(), following)
}

pub fn profile(user: &UserSummary) {
    println!("{}", user_line(user));
    if let Some(bio) = &user.bio {
        println!("  {}", bio);
    }
    println!(
        "  {} posts · {} followers · {} following",
        user.posts_count, user.followers_count, user.following_count
    );
}

pub fn post(post: &Post) {
    let liked = if post.is_liked { "♥" } else { "♡" };
    println!(
        "#{:<5} @{}  {} {}  💬 {}  {}",
        post.id,
        post.user.username,
        liked,
        post.likes_count,
        post.comments_count,
        when(&post.created_at)
    );
    if let Some(caption) = &post.caption {
        println!("       {}", caption);
    }
    println!("       {}", post.image_url);
}

pub fn notification(notification: &Notification) {
    let mark = if notification.is_read { " " } else { "•" };
    println!(
        "{} #{:<5} {}  {}",
        mark,
        notification.id,
        notification.message,
        when(&notification.created_at)
    );
}

pub fn story(story: &Story, now: DateTime<Utc>) {
    let state = if story.is_expired(now) { "  (expired)" } else { "" };
    println!(
        "#{:<5} @{}  {}{}",
        story.id,
        story.user.username,
        when(&story.created_at),
        state
    );
    if let Some(text) = &story.text {
        println!("       {}", text);
    }
}
