//! Scripted [`SocialApi`] double and fixtures shared by component tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use snapline_core::api::{ProfileTarget, SocialApi};
use snapline_core::auth::{AuthGrant, Credentials, Registration};
use snapline_core::error::{Result, SnaplineError};
use snapline_core::media::ImageUpload;
use snapline_core::model::{
    Comment, FeedMode, Notification, NotificationId, NotificationKind, Post, PostId, Story,
    UserId, UserSummary,
};
use snapline_infrastructure::InMemoryTokenStore;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::session_store::SessionStore;

/// Queued responses (each with a delay), then a fallback repeated forever.
struct Script<T> {
    queue: VecDeque<(Duration, Result<T>)>,
    fallback: Result<T>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: Result<T>) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
        }
    }

    fn next(&mut self) -> (Duration, Result<T>) {
        self.queue
            .pop_front()
            .unwrap_or_else(|| (Duration::ZERO, self.fallback.clone()))
    }
}

type Scripts<K, T> = Mutex<HashMap<K, Script<T>>>;

fn set<K: Eq + Hash, T: Clone>(scripts: &Scripts<K, T>, key: K, result: Result<T>) {
    let mut scripts = scripts.lock().unwrap();
    let script = scripts
        .entry(key)
        .or_insert_with(|| Script::new(result.clone()));
    script.fallback = result;
}

fn push<K: Eq + Hash, T: Clone>(
    scripts: &Scripts<K, T>,
    key: K,
    default: Result<T>,
    delay: Duration,
    result: Result<T>,
) {
    scripts
        .lock()
        .unwrap()
        .entry(key)
        .or_insert_with(|| Script::new(default))
        .queue
        .push_back((delay, result));
}

fn next<K: Eq + Hash, T: Clone>(
    scripts: &Scripts<K, T>,
    key: &K,
    default: Result<T>,
) -> (Duration, Result<T>) {
    match scripts.lock().unwrap().get_mut(key) {
        Some(script) => script.next(),
        None => (Duration::ZERO, default),
    }
}

fn not_found<T>() -> Result<T> {
    Err(SnaplineError::NotFoundOrConflict {
        status: 404,
        detail: Some("Not found.".to_string()),
    })
}

/// In-memory [`SocialApi`] that records every call as a label such as
/// `fetch_feed:Explore` or `follow:3`.
#[derive(Default)]
pub struct MockSocialApi {
    calls: Mutex<Vec<String>>,
    login: Mutex<Option<Result<AuthGrant>>>,
    register: Mutex<Option<Result<AuthGrant>>>,
    comment: Mutex<Option<Result<Comment>>>,
    profiles: Scripts<ProfileTarget, UserSummary>,
    feeds: Scripts<FeedMode, Vec<Post>>,
    user_posts: Scripts<ProfileTarget, Vec<Post>>,
    followers: Scripts<ProfileTarget, Vec<UserSummary>>,
    following: Scripts<ProfileTarget, Vec<UserSummary>>,
    searches: Scripts<String, Vec<UserSummary>>,
    notifications: Scripts<(), Vec<Notification>>,
    stories: Scripts<(), Vec<Story>>,
    mutations: Mutex<HashMap<&'static str, (Duration, Result<()>)>>,
}

impl MockSocialApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose label starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|label| label.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_login(&self, result: Result<AuthGrant>) {
        *self.login.lock().unwrap() = Some(result);
    }

    pub fn set_register(&self, result: Result<AuthGrant>) {
        *self.register.lock().unwrap() = Some(result);
    }

    pub fn set_comment(&self, result: Result<Comment>) {
        *self.comment.lock().unwrap() = Some(result);
    }

    pub fn set_profile(&self, target: ProfileTarget, result: Result<UserSummary>) {
        set(&self.profiles, target, result);
    }

    pub fn push_profile(&self, target: ProfileTarget, delay: Duration, result: Result<UserSummary>) {
        push(&self.profiles, target, not_found(), delay, result);
    }

    pub fn set_feed(&self, mode: FeedMode, result: Result<Vec<Post>>) {
        set(&self.feeds, mode, result);
    }

    pub fn push_feed(&self, mode: FeedMode, delay: Duration, result: Result<Vec<Post>>) {
        push(&self.feeds, mode, Ok(Vec::new()), delay, result);
    }

    pub fn set_user_posts(&self, target: ProfileTarget, result: Result<Vec<Post>>) {
        set(&self.user_posts, target, result);
    }

    pub fn push_user_posts(&self, target: ProfileTarget, delay: Duration, result: Result<Vec<Post>>) {
        push(&self.user_posts, target, Ok(Vec::new()), delay, result);
    }

    pub fn set_followers(&self, target: ProfileTarget, result: Result<Vec<UserSummary>>) {
        set(&self.followers, target, result);
    }

    pub fn push_followers(&self, target: ProfileTarget, delay: Duration, result: Result<Vec<UserSummary>>) {
        push(&self.followers, target, Ok(Vec::new()), delay, result);
    }

    pub fn set_following(&self, target: ProfileTarget, result: Result<Vec<UserSummary>>) {
        set(&self.following, target, result);
    }

    pub fn set_search(&self, query: &str, result: Result<Vec<UserSummary>>) {
        set(&self.searches, query.to_string(), result);
    }

    pub fn push_search(&self, query: &str, delay: Duration, result: Result<Vec<UserSummary>>) {
        push(&self.searches, query.to_string(), Ok(Vec::new()), delay, result);
    }

    pub fn set_notifications(&self, result: Result<Vec<Notification>>) {
        set(&self.notifications, (), result);
    }

    pub fn push_notifications(&self, delay: Duration, result: Result<Vec<Notification>>) {
        push(&self.notifications, (), Ok(Vec::new()), delay, result);
    }

    pub fn set_stories(&self, result: Result<Vec<Story>>) {
        set(&self.stories, (), result);
    }

    pub fn push_stories(&self, delay: Duration, result: Result<Vec<Story>>) {
        push(&self.stories, (), Ok(Vec::new()), delay, result);
    }

    /// Scripts every call of mutation `name` (e.g. `"follow"`).
    pub fn set_mutation(&self, name: &'static str, delay: Duration, result: Result<()>) {
        self.mutations.lock().unwrap().insert(name, (delay, result));
    }

    fn mutation(&self, name: &'static str) -> (Duration, Result<()>) {
        self.mutations
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or((Duration::ZERO, Ok(())))
    }

    async fn respond<T>(&self, label: String, scripted: (Duration, Result<T>)) -> Result<T> {
        self.calls.lock().unwrap().push(label);
        let (delay, result) = scripted;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl SocialApi for MockSocialApi {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthGrant> {
        let result = self.login.lock().unwrap().clone().unwrap_or_else(|| {
            Err(SnaplineError::auth(Some(
                "No active account found with the given credentials".to_string(),
            )))
        });
        self.respond("login".to_string(), (Duration::ZERO, result)).await
    }

    async fn register(&self, _registration: &Registration) -> Result<AuthGrant> {
        let result = self
            .register
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(SnaplineError::network("connection refused")));
        self.respond("register".to_string(), (Duration::ZERO, result)).await
    }

    async fn fetch_profile(&self, target: ProfileTarget) -> Result<UserSummary> {
        let scripted = next(&self.profiles, &target, not_found());
        self.respond(format!("fetch_profile:{:?}", target), scripted).await
    }

    async fn fetch_feed(&self, mode: FeedMode) -> Result<Vec<Post>> {
        let scripted = next(&self.feeds, &mode, Ok(Vec::new()));
        self.respond(format!("fetch_feed:{:?}", mode), scripted).await
    }

    async fn toggle_like(&self, post_id: PostId) -> Result<()> {
        let scripted = self.mutation("toggle_like");
        self.respond(format!("toggle_like:{}", post_id), scripted).await
    }

    async fn add_comment(&self, post_id: PostId, text: &str) -> Result<Comment> {
        let result = self
            .comment
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(comment(1, text)));
        self.respond(format!("add_comment:{}", post_id), (Duration::ZERO, result))
            .await
    }

    async fn follow(&self, user_id: UserId) -> Result<()> {
        let scripted = self.mutation("follow");
        self.respond(format!("follow:{}", user_id), scripted).await
    }

    async fn unfollow(&self, user_id: UserId) -> Result<()> {
        let scripted = self.mutation("unfollow");
        self.respond(format!("unfollow:{}", user_id), scripted).await
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let scripted = next(&self.notifications, &(), Ok(Vec::new()));
        self.respond("fetch_notifications".to_string(), scripted).await
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        let scripted = self.mutation("mark_notification_read");
        self.respond(format!("mark_notification_read:{}", id), scripted)
            .await
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        let scripted = self.mutation("mark_all_notifications_read");
        self.respond("mark_all_notifications_read".to_string(), scripted)
            .await
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        let scripted = next(&self.searches, &query.to_string(), Ok(Vec::new()));
        self.respond(format!("search_users:{}", query), scripted).await
    }

    async fn fetch_stories(&self) -> Result<Vec<Story>> {
        let scripted = next(&self.stories, &(), Ok(Vec::new()));
        self.respond("fetch_stories".to_string(), scripted).await
    }

    async fn create_story(&self, _image: &ImageUpload, _text: &str) -> Result<()> {
        let scripted = self.mutation("create_story");
        self.respond("create_story".to_string(), scripted).await
    }

    async fn create_post(&self, _image: &ImageUpload, _caption: &str) -> Result<()> {
        let scripted = self.mutation("create_post");
        self.respond("create_post".to_string(), scripted).await
    }

    async fn fetch_user_posts(&self, target: ProfileTarget) -> Result<Vec<Post>> {
        let scripted = next(&self.user_posts, &target, Ok(Vec::new()));
        self.respond(format!("fetch_user_posts:{:?}", target), scripted)
            .await
    }

    async fn fetch_followers(&self, target: ProfileTarget) -> Result<Vec<UserSummary>> {
        let scripted = next(&self.followers, &target, Ok(Vec::new()));
        self.respond(format!("fetch_followers:{:?}", target), scripted)
            .await
    }

    async fn fetch_following(&self, target: ProfileTarget) -> Result<Vec<UserSummary>> {
        let scripted = next(&self.following, &target, Ok(Vec::new()));
        self.respond(format!("fetch_following:{:?}", target), scripted)
            .await
    }

    async fn update_profile(&self, _bio: &str, _picture: Option<&ImageUpload>) -> Result<()> {
        let scripted = self.mutation("update_profile");
        self.respond("update_profile".to_string(), scripted).await
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const ME: UserId = 1;

/// A fixed instant `minutes` after the fixture epoch.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + ChronoDuration::minutes(minutes)
}

pub fn user(id: UserId, username: &str) -> UserSummary {
    UserSummary::new(id, username)
}

pub fn post(id: PostId, author: UserId) -> Post {
    Post {
        id,
        user: user(author, &format!("user{}", author)),
        image_url: format!("/media/posts/{}.jpg", id),
        caption: None,
        likes_count: 0,
        is_liked: false,
        comments_count: 0,
        comments: Vec::new(),
        created_at: at(id as i64),
    }
}

pub fn comment(id: u64, text: &str) -> Comment {
    Comment {
        id,
        user: user(ME, "me"),
        text: text.to_string(),
        created_at: at(0),
    }
}

pub fn notification(id: NotificationId, is_read: bool) -> Notification {
    Notification {
        id,
        kind: NotificationKind::Like,
        sender: user(50 + id, "fan"),
        message: "fan liked your post".to_string(),
        is_read,
        related_post: Some(7),
        post_image_url: None,
        created_at: at(id as i64),
    }
}

pub fn story(id: u64, created_at: DateTime<Utc>) -> Story {
    Story {
        id,
        user: user(2, "friend"),
        image_url: format!("/media/stories/{}.jpg", id),
        text: None,
        created_at,
        expires_at: None,
    }
}

pub fn grant(token: &str, user: UserSummary) -> AuthGrant {
    AuthGrant {
        access: token.to_string(),
        refresh: Some(format!("{}-refresh", token)),
        user,
    }
}

/// A session store logged in as [`ME`], with the login call cleared from
/// the mock's call log.
pub async fn signed_in(api: &Arc<MockSocialApi>) -> Arc<SessionStore> {
    api.set_login(Ok(grant("tok", user(ME, "me"))));
    let session = Arc::new(SessionStore::new(
        api.clone(),
        Arc::new(InMemoryTokenStore::new()),
        Default::default(),
    ));
    session
        .login(&Credentials::new("me", "pw"))
        .await
        .unwrap();
    api.clear_calls();
    session
}
