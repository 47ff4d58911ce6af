//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo run`, then `cargo test -- --ignored`.

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so tests can run repeatedly against the same database
fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_user(client: &Client, name: &str) -> i32 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No user id") as i32
}

async fn create_book(client: &Client, title: &str, author: &str) -> i32 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": title, "author": author }))
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book");
    body["book"]["id"].as_i64().expect("No book id") as i32
}

async fn borrow(client: &Client, title: &str, user_id: i32) -> reqwest::Response {
    client
        .post(format!("{}/books/borrow", BASE_URL))
        .json(&json!({ "title": title, "userId": user_id }))
        .send()
        .await
        .expect("Failed to send borrow request")
}

async fn return_book(client: &Client, title: &str, user_id: i32) -> reqwest::Response {
    client
        .post(format!("{}/books/return", BASE_URL))
        .json(&json!({ "title": title, "userId": user_id }))
        .send()
        .await
        .expect("Failed to send return request")
}

async fn find_book(client: &Client, id: i32) -> Option<Value> {
    let body: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to list books")
        .json()
        .await
        .expect("Failed to parse books");

    body["books"]
        .as_array()
        .expect("books is not an array")
        .iter()
        .find(|b| b["id"].as_i64() == Some(id as i64))
        .cloned()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_add_and_list_books() {
    let client = Client::new();
    let title = format!("The Dispossessed {}", unique());

    let id = create_book(&client, &title, "Ursula K. Le Guin").await;

    let book = find_book(&client, id).await.expect("created book not listed");
    assert_eq!(book["title"], title.as_str());
    assert_eq!(book["author"], "Ursula K. Le Guin");
    assert_eq!(book["borrowed"], false);
}

#[tokio::test]
#[ignore]
async fn test_add_book_rejects_blank_title() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "", "author": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_title_conflicts() {
    let client = Client::new();
    let title = format!("Solaris {}", unique());

    create_book(&client, &title, "Stanisław Lem").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": title, "author": "Someone Else" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_search_requires_term() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/search", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/books/search?term=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_search_matches_title_and_author_case_insensitively() {
    let client = Client::new();
    let tag = unique();
    let by_title = create_book(&client, &format!("Qvxz Chronicle {}", tag), "Plain Author").await;
    let by_author = create_book(
        &client,
        &format!("Unrelated Title {}", tag),
        &format!("Author QVXZ {}", tag),
    )
    .await;

    let body: Value = client
        .get(format!("{}/books/search?term=qvxz", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let ids: Vec<i64> = body["books"]
        .as_array()
        .expect("books is not an array")
        .iter()
        .filter_map(|b| b["id"].as_i64())
        .collect();

    assert!(ids.contains(&(by_title as i64)), "title match missing");
    assert!(ids.contains(&(by_author as i64)), "author match missing");
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_round_trip() {
    let client = Client::new();
    let tag = unique();
    let title = format!("Roadside Picnic {}", tag);
    let book_id = create_book(&client, &title, "Arkady Strugatsky").await;
    let user_id = create_user(&client, &format!("Red {}", tag)).await;

    // Borrow
    let response = borrow(&client, &title, user_id).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["loan"]["bookTitle"], title.as_str());
    assert!(body["loan"]["borrowedAt"].is_string());

    let book = find_book(&client, book_id).await.expect("book not listed");
    assert_eq!(book["borrowed"], true);

    // Return
    let response = return_book(&client, &title, user_id).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["loan"]["returnedAt"].is_string());
    // No fee block for a same-day return
    assert!(body.get("lateFee").is_none());

    let book = find_book(&client, book_id).await.expect("book not listed");
    assert_eq!(book["borrowed"], false);

    // Exactly one loan was recorded, and it is closed
    let loans: Value = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to list user loans")
        .json()
        .await
        .expect("Failed to parse user loans");

    assert_eq!(loans["activeLoans"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_book_is_not_found() {
    let client = Client::new();
    let user_id = create_user(&client, &format!("Lone Reader {}", unique())).await;

    let response = borrow(&client, &format!("No Such Book {}", unique()), user_id).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrow_unknown_user_is_not_found() {
    let client = Client::new();
    let title = format!("Orphan Book {}", unique());
    create_book(&client, &title, "Anonymous").await;

    let response = borrow(&client, &title, i32::MAX).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrowed_book_cannot_be_borrowed_again() {
    let client = Client::new();
    let tag = unique();
    let title = format!("Hard to Be a God {}", tag);
    create_book(&client, &title, "Arkady Strugatsky").await;
    let first = create_user(&client, &format!("First {}", tag)).await;
    let second = create_user(&client, &format!("Second {}", tag)).await;

    let response = borrow(&client, &title, first).await;
    assert!(response.status().is_success());

    // Even a user well under their limit is refused
    let response = borrow(&client, &title, second).await;
    assert_eq!(response.status(), 400);

    // The refused user gained no loan
    let loans: Value = client
        .get(format!("{}/users/{}/loans", BASE_URL, second))
        .send()
        .await
        .expect("Failed to list user loans")
        .json()
        .await
        .expect("Failed to parse user loans");

    assert_eq!(loans["activeLoans"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_fourth_borrow_hits_the_limit() {
    let client = Client::new();
    let tag = unique();
    let user_id = create_user(&client, &format!("Bookworm {}", tag)).await;

    for n in 1..=3 {
        let title = format!("Volume {} {}", n, tag);
        create_book(&client, &title, "Prolific Author").await;
        let response = borrow(&client, &title, user_id).await;
        assert!(response.status().is_success());
    }

    let title = format!("Volume 4 {}", tag);
    create_book(&client, &title, "Prolific Author").await;

    let response = borrow(&client, &title, user_id).await;
    assert_eq!(response.status(), 400);

    // The refusal left state unchanged: still three active loans
    let loans: Value = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to list user loans")
        .json()
        .await
        .expect("Failed to parse user loans");

    assert_eq!(loans["activeLoans"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
#[ignore]
async fn test_returning_a_book_the_user_never_borrowed_is_not_found() {
    let client = Client::new();
    let tag = unique();
    let title = format!("Untouched Book {}", tag);
    let book_id = create_book(&client, &title, "Anonymous").await;
    let user_id = create_user(&client, &format!("Empty Handed {}", tag)).await;

    let response = return_book(&client, &title, user_id).await;
    assert_eq!(response.status(), 404);

    // Nothing was mutated
    let book = find_book(&client, book_id).await.expect("book not listed");
    assert_eq!(book["borrowed"], false);
}

#[tokio::test]
#[ignore]
async fn test_user_loans_listing() {
    let client = Client::new();
    let tag = unique();
    let title = format!("The Invincible {}", tag);
    create_book(&client, &title, "Stanisław Lem").await;
    let user_id = create_user(&client, &format!("Rohan {}", tag)).await;

    let response = borrow(&client, &title, user_id).await;
    assert!(response.status().is_success());

    let body: Value = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["user"]["id"].as_i64(), Some(user_id as i64));

    let loans = body["activeLoans"].as_array().expect("activeLoans missing");
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0]["bookTitle"], title.as_str());
    assert_eq!(loans[0]["bookAuthor"], "Stanisław Lem");
    assert!(loans[0]["borrowedAt"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_unknown_users_loans_are_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/{}/loans", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_overdue_listing_shape() {
    let client = Client::new();

    // Fresh loans never show up here; this checks the endpoint contract.
    let body: Value = client
        .get(format!("{}/loans/overdue", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let overdue = body["overdueLoans"].as_array().expect("overdueLoans missing");
    for entry in overdue {
        assert!(entry["bookTitle"].is_string());
        assert!(entry["userName"].is_string());
        assert!(entry["daysOverdue"].as_i64().expect("daysOverdue missing") >= 0);
        assert!(entry["estimatedFee"].is_string() || entry["estimatedFee"].is_number());
    }
}

#[tokio::test]
#[ignore]
async fn test_available_books_excludes_borrowed() {
    let client = Client::new();
    let tag = unique();
    let title = format!("Borrowed Away {}", tag);
    let book_id = create_book(&client, &title, "Anonymous").await;
    let user_id = create_user(&client, &format!("Keeper {}", tag)).await;

    let response = borrow(&client, &title, user_id).await;
    assert!(response.status().is_success());

    let body: Value = client
        .get(format!("{}/books/available", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let listed = body["books"]
        .as_array()
        .expect("books is not an array")
        .iter()
        .any(|b| b["id"].as_i64() == Some(book_id as i64));

    assert!(!listed, "borrowed book listed as available");
}

#[tokio::test]
#[ignore]
async fn test_delete_book() {
    let client = Client::new();
    let title = format!("Ephemeral {}", unique());
    let book_id = create_book(&client, &title, "Anonymous").await;

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
    assert!(find_book(&client, book_id).await.is_none());
}
