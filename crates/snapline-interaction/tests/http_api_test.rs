//! Exercises HttpSocialApi against a one-shot local HTTP responder.

use snapline_core::api::{ProfileTarget, SocialApi};
use snapline_core::auth::Credentials;
use snapline_core::config::ClientConfig;
use snapline_core::credential::CredentialHandle;
use snapline_core::error::SnaplineError;
use snapline_core::model::FeedMode;
use snapline_interaction::HttpSocialApi;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const USER: &str = r#"{"id": 7, "username": "bob", "first_name": "Bob", "last_name": "",
    "followers_count": 1, "following_count": 2, "posts_count": 0,
    "profile": {"bio": "hi", "profile_picture_url": null}}"#;

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

/// Accepts one connection, replies with `status` and `body`, and yields the
/// raw request text (lowercased) for assertions.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&buf).to_ascii_lowercase()
    });

    (format!("http://{}/api", addr), handle)
}

fn api_for(api_root: String, credential: CredentialHandle) -> HttpSocialApi {
    let config = ClientConfig {
        api_root,
        request_timeout_secs: Some(5),
        ..ClientConfig::default()
    };
    HttpSocialApi::new(&config, credential)
}

#[tokio::test]
async fn test_attached_credential_is_sent_as_bearer() {
    let body = format!(
        r#"[{{"id": 1, "user": {USER}, "image_display_url": "/media/1.jpg",
            "caption": "sunset", "likes_count": 2, "is_liked": true,
            "comments_count": 0, "created_at": "2024-05-01T10:00:00Z"}}]"#
    );
    let (root, server) = serve_once("200 OK", body).await;
    let credential = CredentialHandle::new();
    credential.attach("tok123");

    let posts = api_for(root, credential).fetch_feed(FeedMode::Following).await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("get /api/feed/ http/1.1"), "{}", request);
    assert!(request.contains("authorization: bearer tok123"));
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].caption.as_deref(), Some("sunset"));
    assert!(posts[0].is_liked);
}

#[tokio::test]
async fn test_detached_credential_sends_no_authorization() {
    let (root, server) = serve_once("200 OK", "[]".to_string()).await;
    let credential = CredentialHandle::new();
    credential.attach("tok123");
    credential.detach();

    let posts = api_for(root, credential).fetch_feed(FeedMode::Explore).await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("get /api/posts/ "));
    assert!(!request.contains("authorization:"));
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_profile_of_other_user() {
    let (root, server) = serve_once("200 OK", USER.to_string()).await;
    let user = api_for(root, CredentialHandle::new())
        .fetch_profile(ProfileTarget::User(7))
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("get /api/profile/7/ "));
    assert_eq!(user.username, "bob");
    assert_eq!(user.bio.as_deref(), Some("hi"));
}

#[tokio::test]
async fn test_401_maps_to_auth_error() {
    let (root, server) = serve_once(
        "401 Unauthorized",
        r#"{"detail": "Token is invalid or expired"}"#.to_string(),
    )
    .await;
    let err = api_for(root, CredentialHandle::new())
        .fetch_profile(ProfileTarget::Own)
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(err.is_auth());
    assert_eq!(err.detail(), Some("Token is invalid or expired"));
}

#[tokio::test]
async fn test_login_posts_credentials_as_json() {
    let body = format!(r#"{{"user": {USER}, "refresh": "r1", "access": "a1"}}"#);
    let (root, server) = serve_once("200 OK", body).await;

    let grant = api_for(root, CredentialHandle::new())
        .login(&Credentials::new("bob", "secret"))
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("post /api/auth/login/ "));
    assert!(request.contains("content-type: application/json"));
    assert!(request.contains(r#""username":"bob""#));
    assert_eq!(grant.access, "a1");
    assert_eq!(grant.user.id, 7);
}

#[tokio::test]
async fn test_search_sends_query_parameter() {
    let (root, server) = serve_once("200 OK", format!("[{USER}]")).await;
    let users = api_for(root, CredentialHandle::new())
        .search_users("bo")
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("get /api/users/search/?q=bo "));
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let (root, server) = serve_once("200 OK", r#"{"results": []}"#.to_string()).await;
    let err = api_for(root, CredentialHandle::new())
        .fetch_notifications()
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SnaplineError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api_for(format!("http://{}/api", addr), CredentialHandle::new())
        .fetch_stories()
        .await
        .unwrap_err();
    assert!(err.is_network());
}
