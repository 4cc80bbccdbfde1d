//! E2E tests for bookmark add/remove

mod common;

use common::TestServer;

async fn add_bookmark(
    server: &TestServer,
    token: &str,
    post_id: &str,
) -> reqwest::Response {
    server
        .client
        .patch(server.url("/addBookmark"))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"_id": post_id}))
        .send()
        .await
        .expect("request succeeds")
}

async fn remove_bookmark(
    server: &TestServer,
    token: &str,
    post_id: &str,
) -> reqwest::Response {
    server
        .client
        .delete(server.url(&format!("/removeBookmark/{}", post_id)))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("request succeeds")
}

#[tokio::test]
async fn test_add_bookmark_returns_joined_view() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.register_user("alice", "pw1").await;
    let (bob_id, _bob_token) = server.register_user("bob", "pw2").await;
    let post = server.seed_post(&bob_id, "hello from bob").await;

    let response = add_bookmark(&server, &alice_token, &post.id).await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Added to bookmarks");

    let bookmarks = body["data"]["bookmarks"].as_array().expect("bookmarks array");
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0]["id"], post.id);
    assert_eq!(bookmarks[0]["content"], "hello from bob");
    // The author's summary is joined in.
    assert_eq!(bookmarks[0]["author"]["username"], "bob");
    assert!(bookmarks[0]["author"]["profile_pic"].is_string());

    // The public profile fetch serves the same joined view.
    let alice_id = body["data"]["id"].as_str().unwrap();
    let profile = server.fetch_profile(alice_id).await;
    let bookmarks = profile["data"]["bookmarks"].as_array().unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0]["author"]["username"], "bob");
}

#[tokio::test]
async fn test_remove_bookmark_strips_every_occurrence() {
    let server = TestServer::new().await;
    let (alice_id, alice_token) = server.register_user("alice", "pw1").await;
    let (bob_id, _bob_token) = server.register_user("bob", "pw2").await;
    let post = server.seed_post(&bob_id, "hello").await;

    // Bookmark the same post twice: both copies are stored.
    assert_eq!(add_bookmark(&server, &alice_token, &post.id).await.status(), 200);
    let response = add_bookmark(&server, &alice_token, &post.id).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["bookmarks"].as_array().unwrap().len(), 2);

    // A single removal strips both.
    let response = remove_bookmark(&server, &alice_token, &post.id).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Removed from bookmarks");
    assert!(body["data"]["bookmarks"].as_array().unwrap().is_empty());

    let alice = server.state.db.get_user(&alice_id).await.unwrap().unwrap();
    assert!(alice.bookmarks.is_empty());
}

#[tokio::test]
async fn test_remove_unbookmarked_post_is_not_an_error() {
    let server = TestServer::new().await;
    let (_alice_id, alice_token) = server.register_user("alice", "pw1").await;

    let response = remove_bookmark(&server, &alice_token, "never-bookmarked").await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"]["bookmarks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bookmarking_unknown_post_succeeds_but_join_drops_it() {
    let server = TestServer::new().await;
    let (alice_id, alice_token) = server.register_user("alice", "pw1").await;

    // No existence check on the post id at mutation time.
    let response = add_bookmark(&server, &alice_token, "no-such-post").await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    // The raw id is stored but the joined view cannot resolve it.
    assert!(body["data"]["bookmarks"].as_array().unwrap().is_empty());

    let alice = server.state.db.get_user(&alice_id).await.unwrap().unwrap();
    assert_eq!(alice.bookmarks, vec!["no-such-post"]);
}

#[tokio::test]
async fn test_bookmark_routes_require_token() {
    let server = TestServer::new().await;

    let response = server
        .client
        .patch(server.url("/addBookmark"))
        .json(&serde_json::json!({"_id": "post"}))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 401);

    let response = server
        .client
        .delete(server.url("/removeBookmark/post"))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 401);
}
