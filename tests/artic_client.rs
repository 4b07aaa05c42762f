use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

use easel::{select_first_n, ArticClient, FetchError, RecordSource, Session};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Serves a 30-record catalogue in pages of `limit`, recording every query.
async fn listing(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    seen.lock().unwrap().push(params.clone());
    let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u64 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(12);
    let start = (page - 1) * limit;
    let data: Vec<_> = (start + 1..=(start + limit).min(30))
        .map(|id| {
            let origin = if id % 2 == 0 { json!("Japan") } else { json!(null) };
            json!({
                "id": id,
                "title": format!("Study {id}"),
                "place_of_origin": origin,
                "artist_display": "Katsushika Hokusai\nJapanese, 1760-1849",
                "inscriptions": null,
                "date_start": 1830,
                "date_end": 1833
            })
        })
        .collect();
    axum::Json(json!({
        "pagination": { "total": 30, "limit": limit, "offset": start, "current_page": page },
        "data": data
    }))
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}/api/v1/artworks")
}

async fn catalogue() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/api/v1/artworks", get(listing))
        .with_state(seen.clone());
    (serve(router).await, seen)
}

#[tokio::test]
async fn offset_becomes_page_and_limit() {
    let (url, seen) = catalogue().await;
    let client = ArticClient::new(url, 12);

    let page = client.fetch(24).await.unwrap();
    assert_eq!(page.total, 30);
    assert_eq!(page.records.len(), 6);
    assert_eq!(page.records[0].id, 25);
    assert_eq!(page.records[0].place_of_origin, None);
    assert_eq!(page.records[1].place_of_origin.as_deref(), Some("Japan"));

    let seen = seen.lock().unwrap();
    let q = &seen[0];
    assert_eq!(q.get("page").map(String::as_str), Some("3"));
    assert_eq!(q.get("limit").map(String::as_str), Some("12"));
    assert!(q.get("fields").is_some_and(|f| f.contains("artist_display")));
}

#[tokio::test]
async fn selector_over_http_fetches_only_needed_pages() {
    let (url, seen) = catalogue().await;
    let client = ArticClient::new(url, 12);
    let mut session = Session::new(12);

    let outcome = select_first_n(&mut session, &client, "20").await.unwrap();
    assert_eq!(outcome.selected, 20);
    assert_eq!(seen.lock().unwrap().len(), 2);
    assert!(!session.cache.contains(3));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let router = Router::new().route(
        "/api/v1/artworks",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
    );
    let client = ArticClient::new(serve(router).await, 12);

    match client.fetch(0).await {
        Err(FetchError::UnexpectedStatus { status, body }) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "try later");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let router = Router::new().route(
        "/api/v1/artworks",
        get(|| async { axum::Json(json!({ "data": [] })) }),
    );
    let client = ArticClient::new(serve(router).await, 12);
    let mut session = Session::new(12);

    let err = session.fetch_page(&client, 1).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    assert!(session.cache.is_empty());
    assert_eq!(session.total_records, None);
}
