mod common;

use std::cmp::Ordering;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{TestApp, msg};
use tabletop_types::models::Review;

const SORTABLE: [&str; 8] = [
    "owner",
    "title",
    "designer",
    "review_img_url",
    "review_body",
    "category",
    "created_at",
    "votes",
];

fn reviews(body: &Value) -> Vec<Review> {
    serde_json::from_value(body["reviews"].clone()).unwrap()
}

fn compare(column: &str, a: &Review, b: &Review) -> Ordering {
    match column {
        "owner" => a.owner.cmp(&b.owner),
        "title" => a.title.cmp(&b.title),
        "designer" => a.designer.cmp(&b.designer),
        "review_img_url" => a.review_img_url.cmp(&b.review_img_url),
        "review_body" => a.review_body.cmp(&b.review_body),
        "category" => a.category.cmp(&b.category),
        "created_at" => a.created_at.cmp(&b.created_at),
        "votes" => a.votes.cmp(&b.votes),
        other => panic!("unexpected column {}", other),
    }
}

fn is_sorted(list: &[Review], column: &str, descending: bool) -> bool {
    let out_of_order = if descending { Ordering::Less } else { Ordering::Greater };
    list.windows(2)
        .all(|w| compare(column, &w[0], &w[1]) != out_of_order)
}

// -- GET /api/reviews --

#[tokio::test]
async fn lists_all_reviews_newest_first() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews").await;
    assert_eq!(status, StatusCode::OK);

    let list = reviews(&body);
    assert_eq!(list.len(), 13);
    assert!(is_sorted(&list, "created_at", true));
    for review in &list {
        assert!(review.comment_count.is_some());
    }

    // Every documented field is present on the wire.
    let first = body["reviews"][0].as_object().unwrap();
    for key in [
        "review_id", "title", "designer", "owner", "review_img_url",
        "review_body", "category", "created_at", "votes", "comment_count",
    ] {
        assert!(first.contains_key(key), "missing {}", key);
    }
}

#[tokio::test]
async fn sorts_by_every_allowed_column_in_both_directions() {
    let app = TestApp::new();
    for column in SORTABLE {
        for (order, descending) in [("asc", false), ("desc", true)] {
            let uri = format!("/api/reviews?sort_by={}&order={}", column, order);
            let (status, body) = app.get(&uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(is_sorted(&reviews(&body), column, descending), "{}", uri);
        }
    }
}

#[tokio::test]
async fn order_defaults_to_descending() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/reviews?sort_by=title").await;
    assert!(is_sorted(&reviews(&body), "title", true));
}

#[tokio::test]
async fn rejects_unknown_sort_column() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews?sort_by=invalid_query").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid sort query");
}

#[tokio::test]
async fn sort_error_reported_regardless_of_other_params() {
    let app = TestApp::new();
    let (status, body) = app
        .get("/api/reviews?sort_by=review_id&order=sideways&category=turd%20burgling")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid sort query");
}

#[tokio::test]
async fn rejects_unknown_order() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews?order=invalid_query").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid order query");

    let (status, _) = app.get("/api/reviews?order=DESC").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filters_by_category() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews?category=social%20deduction").await;
    assert_eq!(status, StatusCode::OK);

    let list = reviews(&body);
    assert_eq!(list.len(), 11);
    assert!(list.iter().all(|r| r.category == "social deduction"));
}

#[tokio::test]
async fn empty_category_means_no_filter() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews?category=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews(&body).len(), 13);
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews?category=turd%20burgling").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(msg(&body), "Category: turd burgling does not exist");
}

#[tokio::test]
async fn existing_category_without_reviews_is_empty() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews?category=children%27s%20games").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"], json!([]));
}

#[tokio::test]
async fn category_filter_is_not_injectable() {
    let app = TestApp::new();
    let (status, _) = app
        .get("/api/reviews?category=dexterity%27%20OR%20%271%27%3D%271")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/reviews").await;
    assert_eq!(reviews(&body).len(), 13);
}

// -- GET /api/reviews/{review_id} --

#[tokio::test]
async fn fetches_single_review_with_zero_comment_count() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["review"],
        json!({
            "review_id": 1,
            "title": "Agricola",
            "designer": "Uwe Rosenberg",
            "owner": "mallionaire",
            "review_img_url": "https://www.golenbock.com/wp-content/uploads/2015/01/placeholder-user.png",
            "review_body": "Farmyard fun!",
            "category": "euro game",
            "created_at": "2021-01-18T10:00:20.514Z",
            "votes": 1,
            "comment_count": 0
        })
    );
}

#[tokio::test]
async fn counts_comments_on_single_review() {
    let app = TestApp::new();
    let (_, body) = app.get("/api/reviews/3").await;
    assert_eq!(body["review"]["title"], "Ultimate Werewolf");
    assert_eq!(body["review"]["comment_count"], 3);
}

#[tokio::test]
async fn missing_review_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(msg(&body), "Review 999999 does not exist");
}

#[tokio::test]
async fn non_numeric_review_id_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews/invalid_id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid request");
}

#[tokio::test]
async fn undecodable_review_id_is_json_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/reviews/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid request");

    let (status, body) = app.patch("/api/reviews/%FF", json!({ "inc_votes": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid request");
}

// -- PATCH /api/reviews/{review_id} --

#[tokio::test]
async fn increments_votes_and_returns_row() {
    let app = TestApp::new();
    let (status, body) = app.patch("/api/reviews/3", json!({ "inc_votes": 5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["review"],
        json!({
            "review_id": 3,
            "title": "Ultimate Werewolf",
            "designer": "Akihisa Okui",
            "owner": "bainesface",
            "review_img_url": "https://www.golenbock.com/wp-content/uploads/2015/01/placeholder-user.png",
            "review_body": "We couldn't find the werewolf!",
            "category": "social deduction",
            "created_at": "2021-01-18T10:01:41.251Z",
            "votes": 10
        })
    );

    let (_, body) = app.patch("/api/reviews/3", json!({ "inc_votes": -12 })).await;
    assert_eq!(body["review"]["votes"], -2);
}

#[tokio::test]
async fn patch_missing_review_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.patch("/api/reviews/999999", json!({ "inc_votes": 5 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(msg(&body), "Review 999999 does not exist");
}

#[tokio::test]
async fn patch_non_numeric_id_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.patch("/api/reviews/invalid_id", json!({ "inc_votes": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid request");
}

#[tokio::test]
async fn patch_non_numeric_inc_votes_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.patch("/api/reviews/3", json!({ "inc_votes": "cat" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid request");
}

#[tokio::test]
async fn patch_unknown_key_is_named() {
    let app = TestApp::new();
    let (status, body) = app.patch("/api/reviews/3", json!({ "totes": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "totes is an invalid request property");

    // Votes are untouched.
    let (_, body) = app.get("/api/reviews/3").await;
    assert_eq!(body["review"]["votes"], 5);
}

#[tokio::test]
async fn patch_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::PATCH, "/api/reviews/3", Some("{inc_votes:".into()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "Invalid request");
}

#[tokio::test]
async fn patch_names_first_unknown_key_as_sent() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::PATCH, "/api/reviews/3", Some(r#"{"zzz": 1, "aaa": 2}"#.into()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg(&body), "zzz is an invalid request property");
}
