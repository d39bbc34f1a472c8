//! API integration tests against a running server
//!
//! Start the server with a bootstrap staff account `admin`/`admin`
//! (`CATALOG_AUTH__BOOTSTRAP_USERNAME=admin CATALOG_AUTH__BOOTSTRAP_PASSWORD=admin`),
//! then run `cargo test -- --ignored`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080";
const API_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get a staff token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", API_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Unique suffix so repeated runs do not collide on unique names
fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

fn unique_isbn() -> String {
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(10)
        .collect();
    format!("978{}", digits)
}

async fn post(client: &Client, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}/admin{}", API_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn put(client: &Client, token: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .put(format!("{}/admin{}", API_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn get(client: &Client, token: &str, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}/admin{}", API_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn delete(client: &Client, token: &str, path: &str) -> StatusCode {
    client
        .delete(format!("{}/admin{}", API_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .status()
}

async fn create_genre(client: &Client, token: &str) -> i64 {
    let (status, body) = post(client, token, "/genres", json!({ "name": unique("Genre") })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No genre ID")
}

async fn create_author(client: &Client, token: &str, last_name: &str) -> i64 {
    create_named_author(client, token, "Test", last_name).await
}

async fn create_named_author(client: &Client, token: &str, first_name: &str, last_name: &str) -> i64 {
    let (status, body) = post(
        client,
        token,
        "/authors",
        json!({
            "first_name": first_name,
            "last_name": last_name,
            "date_of_birth": "1950-01-01",
            "date_of_death": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No author ID")
}

/// Walk every page of a public list, keeping entries that match
async fn collect_public(client: &Client, path: &str, keep: impl Fn(&Value) -> bool) -> Vec<Value> {
    let mut kept = Vec::new();
    for page in 1.. {
        let body: Value = client
            .get(format!("{}{}?page={}", BASE_URL, path, page))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        let items = body["items"].as_array().cloned().unwrap_or_default();
        if items.is_empty() {
            break;
        }
        kept.extend(items.into_iter().filter(|item| keep(item)));
    }
    kept
}

async fn create_book(
    client: &Client,
    token: &str,
    title: &str,
    author_id: i64,
    language_id: Option<i64>,
    genre_id: i64,
) -> i64 {
    let (status, body) = post(
        client,
        token,
        "/books",
        json!({
            "title": title,
            "author_id": author_id,
            "summary": "Summary",
            "isbn": unique_isbn(),
            "language_id": language_id,
            "genre_ids": [genre_id]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().expect("No book ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", API_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", API_URL))
        .json(&json!({
            "username": "ADMIN",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["is_staff"], true);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", API_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_index_counts() {
    let client = Client::new();

    let response = client.get(BASE_URL).send().await.expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["num_books"].is_number());
    assert!(body["num_instances_available"].as_i64() <= body["num_instances"].as_i64());
}

#[tokio::test]
#[ignore]
async fn test_genre_names_unique_ignoring_case() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let name = unique("Science Fiction");

    let (status, body) = post(&client, &token, "/genres", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("No genre ID");

    let (status, _) = post(&client, &token, "/genres", json!({ "name": name.to_uppercase() })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Renaming a genre to its own name is not a conflict
    let (status, _) = put(&client, &token, &format!("/genres/{}", id), json!({ "name": name })).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(delete(&client, &token, &format!("/genres/{}", id)).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_language_names_unique_ignoring_case() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let name = unique("Esperanto");

    let (status, body) = post(&client, &token, "/languages", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("No language ID");

    let (status, _) = post(&client, &token, "/languages", json!({ "name": name.to_lowercase() })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(delete(&client, &token, &format!("/languages/{}", id)).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_author_with_books_cannot_be_deleted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let book_id = create_book(&client, &token, "Kept", author_id, None, genre_id).await;

    let status = delete(&client, &token, &format!("/authors/{}", author_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(delete(&client, &token, &format!("/books/{}", book_id)).await, StatusCode::NO_CONTENT);
    assert_eq!(
        delete(&client, &token, &format!("/authors/{}", author_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(delete(&client, &token, &format!("/genres/{}", genre_id)).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_book_with_instances_cannot_be_deleted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let book_id = create_book(&client, &token, "Lent", author_id, None, genre_id).await;

    let (status, instance) = post(
        &client,
        &token,
        &format!("/books/{}/instances", book_id),
        json!({ "imprint": "First edition", "due_back": null, "status": "available" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let instance_id = instance["general"]["id"].as_str().expect("No instance ID").to_string();

    assert_eq!(delete(&client, &token, &format!("/books/{}", book_id)).await, StatusCode::CONFLICT);

    assert_eq!(
        delete(&client, &token, &format!("/bookinstances/{}", instance_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(delete(&client, &token, &format!("/books/{}", book_id)).await, StatusCode::NO_CONTENT);
    assert_eq!(
        delete(&client, &token, &format!("/authors/{}", author_id)).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(delete(&client, &token, &format!("/genres/{}", genre_id)).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflicts() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let book_id = create_book(&client, &token, "Original", author_id, None, genre_id).await;

    let (_, book) = get(&client, &token, &format!("/books/{}", book_id)).await;
    let (status, _) = post(
        &client,
        &token,
        "/books",
        json!({
            "title": "Copycat",
            "author_id": author_id,
            "summary": "Summary",
            "isbn": book["isbn"],
            "language_id": null,
            "genre_ids": [genre_id]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    delete(&client, &token, &format!("/books/{}", book_id)).await;
    delete(&client, &token, &format!("/authors/{}", author_id)).await;
    delete(&client, &token, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_language_clears_book_language() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let (_, language) = post(&client, &token, "/languages", json!({ "name": unique("Klingon") })).await;
    let language_id = language["id"].as_i64().expect("No language ID");
    let book_id = create_book(&client, &token, "Translated", author_id, Some(language_id), genre_id).await;

    assert_eq!(
        delete(&client, &token, &format!("/languages/{}", language_id)).await,
        StatusCode::NO_CONTENT
    );

    let (status, book) = get(&client, &token, &format!("/books/{}", book_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(book["language"].is_null());

    delete(&client, &token, &format!("/books/{}", book_id)).await;
    delete(&client, &token, &format!("/authors/{}", author_id)).await;
    delete(&client, &token, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_author_books_ordered_by_title() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let second = create_book(&client, &token, "Zebra Crossing", author_id, None, genre_id).await;
    let first = create_book(&client, &token, "Aardvark Tales", author_id, None, genre_id).await;

    let (status, books) = get(&client, &token, &format!("/authors/{}/books", author_id)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = books
        .as_array()
        .expect("Book list")
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Aardvark Tales", "Zebra Crossing"]);

    delete(&client, &token, &format!("/books/{}", first)).await;
    delete(&client, &token, &format!("/books/{}", second)).await;
    delete(&client, &token, &format!("/authors/{}", author_id)).await;
    delete(&client, &token, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_overdue_instance_flagged() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let book_id = create_book(&client, &token, "Late", author_id, None, genre_id).await;

    let (status, instance) = post(
        &client,
        &token,
        "/bookinstances",
        json!({
            "book_id": book_id,
            "imprint": "Paperback",
            "due_back": "2001-01-01",
            "borrower_id": null,
            "status": "on_loan"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let instance_id = instance["general"]["id"].as_str().expect("No instance ID").to_string();

    let (_, instances) = get(&client, &token, &format!("/books/{}/instances", book_id)).await;
    let entry = &instances.as_array().expect("Instance list")[0];
    assert_eq!(entry["is_overdue"], true);

    let (_, filtered) = get(&client, &token, "/bookinstances?status=on_loan&due_back=has_date").await;
    assert!(filtered["items"]
        .as_array()
        .expect("Instance page")
        .iter()
        .any(|i| i["id"] == instance_id.as_str()));

    delete(&client, &token, &format!("/bookinstances/{}", instance_id)).await;
    delete(&client, &token, &format!("/books/{}", book_id)).await;
    delete(&client, &token, &format!("/authors/{}", author_id)).await;
    delete(&client, &token, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_authors_ordered_by_last_then_first_name() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let tag = unique("Order");

    let zoe = create_named_author(&client, &token, "Zoe", &format!("{} Lin", tag)).await;
    let adam = create_named_author(&client, &token, "Adam", &format!("{} Lin", tag)).await;
    let mia = create_named_author(&client, &token, "Mia", &format!("{} Kay", tag)).await;

    let authors = collect_public(&client, "/authors/", |a| {
        a["last_name"].as_str().is_some_and(|name| name.starts_with(&tag))
    })
    .await;
    let ids: Vec<i64> = authors.iter().filter_map(|a| a["id"].as_i64()).collect();
    assert_eq!(ids, vec![mia, adam, zoe]);

    for id in [zoe, adam, mia] {
        delete(&client, &token, &format!("/authors/{}", id)).await;
    }
}

#[tokio::test]
#[ignore]
async fn test_books_with_same_title_ordered_by_author() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let tag = unique("Same");

    let zed = create_named_author(&client, &token, "Ann", &format!("{} Zed", tag)).await;
    let abe = create_named_author(&client, &token, "Ann", &format!("{} Abe", tag)).await;
    let by_zed = create_book(&client, &token, &tag, zed, None, genre_id).await;
    let by_abe = create_book(&client, &token, &tag, abe, None, genre_id).await;

    let books = collect_public(&client, "/books/", |b| b["title"] == tag.as_str()).await;
    let ids: Vec<i64> = books.iter().filter_map(|b| b["id"].as_i64()).collect();
    assert_eq!(ids, vec![by_abe, by_zed]);

    delete(&client, &token, &format!("/books/{}", by_zed)).await;
    delete(&client, &token, &format!("/books/{}", by_abe)).await;
    delete(&client, &token, &format!("/authors/{}", zed)).await;
    delete(&client, &token, &format!("/authors/{}", abe)).await;
    delete(&client, &token, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_user_clears_borrower() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let genre_id = create_genre(&client, &token).await;
    let author_id = create_author(&client, &token, &unique("Author")).await;
    let book_id = create_book(&client, &token, "Borrowed", author_id, None, genre_id).await;

    let username = format!("reader{}", &Uuid::new_v4().simple().to_string()[..8]);
    let (status, user) = post(
        &client,
        &token,
        "/users",
        json!({ "username": username, "password": "secret", "email": null }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().expect("No user ID");

    let (status, instance) = post(
        &client,
        &token,
        "/bookinstances",
        json!({
            "book_id": book_id,
            "imprint": "Hardcover",
            "due_back": "2099-01-01",
            "borrower_id": user_id,
            "status": "on_loan"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(instance["availability"]["borrower"]["id"], user_id);
    let instance_id = instance["general"]["id"].as_str().expect("No instance ID").to_string();

    assert_eq!(delete(&client, &token, &format!("/users/{}", user_id)).await, StatusCode::NO_CONTENT);

    let (status, instance) = get(&client, &token, &format!("/bookinstances/{}", instance_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(instance["availability"]["borrower"].is_null());
    assert_eq!(instance["availability"]["status"], "on_loan");

    delete(&client, &token, &format!("/bookinstances/{}", instance_id)).await;
    delete(&client, &token, &format!("/books/{}", book_id)).await;
    delete(&client, &token, &format!("/authors/{}", author_id)).await;
    delete(&client, &token, &format!("/genres/{}", genre_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_deleted_staff_token_loses_access() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let username = format!("staff{}", &Uuid::new_v4().simple().to_string()[..8]);
    let (status, user) = post(
        &client,
        &token,
        "/users",
        json!({ "username": username, "password": "secret", "is_staff": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().expect("No user ID");

    let login: Value = client
        .post(format!("{}/auth/login", API_URL))
        .json(&json!({ "username": username, "password": "secret" }))
        .send()
        .await
        .expect("Failed to send login request")
        .json()
        .await
        .expect("Failed to parse login response");
    let staff_token = login["token"].as_str().expect("No token in response").to_string();

    let (status, _) = get(&client, &staff_token, "/genres").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(delete(&client, &token, &format!("/users/{}", user_id)).await, StatusCode::NO_CONTENT);

    let (status, _) = get(&client, &staff_token, "/genres").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
