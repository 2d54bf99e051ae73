use super::*;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::{domain::Card, error::ErrorCode};
use tokio::net::TcpListener;

use crate::{DeckController, DrawOutcome, InitOutcome, ShuffleOutcome, EXHAUSTED_DECK_MESSAGE};

const TEST_DECK_ID: &str = "abc123";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Clone, Default)]
struct DeckServerState {
    decks: Arc<Mutex<HashMap<String, Vec<String>>>>,
    requests: Arc<Mutex<Vec<String>>>,
    new_deck_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl DeckServerState {
    fn with_cards(cards: &[&str]) -> Self {
        let state = Self::default();
        state.decks.lock().expect("decks").insert(
            TEST_DECK_ID.to_string(),
            cards.iter().map(|code| code.to_string()).collect(),
        );
        state
    }

    fn record(&self, request: impl Into<String>) {
        self.requests.lock().expect("requests").push(request.into());
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests").clone()
    }
}

fn card_json(code: &str) -> serde_json::Value {
    json!({
        "code": code,
        "image": format!("/static/img/{code}.png"),
        "images": {
            "svg": format!("/static/img/{code}.svg"),
            "png": format!("/static/img/{code}.png"),
        },
        "value": "ACE",
        "suit": "SPADES",
    })
}

async fn new_deck(
    State(state): State<DeckServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    state.record("new");
    state
        .new_deck_queries
        .lock()
        .expect("queries")
        .push(query);
    let remaining = state
        .decks
        .lock()
        .expect("decks")
        .get(TEST_DECK_ID)
        .map_or(0, Vec::len);
    Json(json!({
        "success": true,
        "deck_id": TEST_DECK_ID,
        "shuffled": true,
        "remaining": remaining,
    }))
}

async fn reshuffle(
    State(state): State<DeckServerState>,
    Path(deck_id): Path<String>,
) -> Response {
    state.record(format!("shuffle:{deck_id}"));
    let decks = state.decks.lock().expect("decks");
    let Some(cards) = decks.get(&deck_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    Json(json!({
        "success": true,
        "deck_id": deck_id,
        "shuffled": true,
        "remaining": cards.len(),
    }))
    .into_response()
}

async fn draw(
    State(state): State<DeckServerState>,
    Path(deck_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(format!(
        "draw:{deck_id}:{}",
        query.get("count").cloned().unwrap_or_default()
    ));
    let mut decks = state.decks.lock().expect("decks");
    let Some(cards) = decks.get_mut(&deck_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let body = match cards.pop() {
        Some(code) => json!({
            "success": true,
            "deck_id": deck_id,
            "cards": [card_json(&code)],
            "remaining": cards.len(),
        }),
        None => json!({
            "success": false,
            "deck_id": deck_id,
            "cards": [],
            "remaining": 0,
            "error": "Not enough cards remaining to draw 1 additional",
        }),
    };
    Json(body).into_response()
}

async fn card_image(Path(name): Path<String>) -> Response {
    if name.ends_with(".png") {
        (StatusCode::OK, PNG_MAGIC.to_vec()).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn spawn_deck_server(state: DeckServerState) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/deck/new/shuffle/", get(new_deck))
        .route("/api/deck/:deck_id/shuffle/", get(reshuffle))
        .route("/api/deck/:deck_id/draw/", get(draw))
        .route("/static/img/:name", get(card_image))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[test]
fn endpoints_keep_trailing_slash_and_base_path() {
    let api = HttpDeckApi::new("https://cards.example/proxy").expect("api");
    let url = api
        .endpoint(&["abc123", "draw"])
        .expect("endpoint");
    assert_eq!(url.as_str(), "https://cards.example/proxy/api/deck/abc123/draw/");

    let api = HttpDeckApi::new("https://cards.example/").expect("api");
    let url = api.endpoint(&["new", "shuffle"]).expect("endpoint");
    assert_eq!(url.as_str(), "https://cards.example/api/deck/new/shuffle/");
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        HttpDeckApi::new("not a url"),
        Err(DeckApiError::InvalidUrl(_))
    ));
    assert!(matches!(
        HttpDeckApi::new("mailto:cards@example.com"),
        Err(DeckApiError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn http_api_speaks_the_card_api_shapes() {
    let state = DeckServerState::with_cards(&["KH", "AS"]);
    let base = spawn_deck_server(state.clone()).await.expect("server");
    let api = HttpDeckApi::new(&base).expect("api");

    let deck = api.new_shuffled_deck(1).await.expect("new deck");
    assert_eq!(deck.deck_id, DeckId::new(TEST_DECK_ID));
    assert_eq!(deck.remaining, 2);
    assert_eq!(
        state.new_deck_queries.lock().expect("queries")[0]
            .get("deck_count")
            .map(String::as_str),
        Some("1")
    );

    let drawn = api.draw(&deck.deck_id, 1).await.expect("draw");
    let card = drawn.first_card().expect("card");
    assert_eq!(card.code.as_deref(), Some("AS"));
    assert_eq!(card.image_url, "/static/img/AS.png");
    assert_eq!(drawn.remaining, 1);

    let shuffled = api.reshuffle(&deck.deck_id).await.expect("shuffle");
    assert!(shuffled.shuffled);

    assert_eq!(
        state.requests(),
        vec!["new", "draw:abc123:1", "shuffle:abc123"]
    );
}

#[tokio::test]
async fn unknown_deck_is_a_status_error() {
    let state = DeckServerState::with_cards(&[]);
    let base = spawn_deck_server(state).await.expect("server");
    let api = HttpDeckApi::new(&base).expect("api");

    let err = api
        .draw(&DeckId::new("missing"), 1)
        .await
        .expect_err("should fail");
    assert!(matches!(err, DeckApiError::Status { status: 404, .. }));
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpDeckApi::new(&format!("http://{addr}")).expect("api");
    let err = api.new_shuffled_deck(1).await.expect_err("should fail");
    assert_eq!(err.code(), ErrorCode::Transport);
}

#[tokio::test]
async fn card_images_resolve_relative_to_the_api() {
    let base = spawn_deck_server(DeckServerState::default())
        .await
        .expect("server");
    let api = HttpDeckApi::new(&base).expect("api");

    let bytes = api
        .fetch_card_image("/static/img/AS.png")
        .await
        .expect("image");
    assert_eq!(bytes, PNG_MAGIC);

    let err = api
        .fetch_card_image(&format!("{base}/static/img/AS.gif"))
        .await
        .expect_err("missing image");
    assert!(matches!(err, DeckApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn controller_plays_a_deck_to_exhaustion_over_http() {
    let state = DeckServerState::with_cards(&["2C", "KH"]);
    let base = spawn_deck_server(state.clone()).await.expect("server");
    let controller = DeckController::new(HttpDeckApi::new(&base).expect("api"));

    let outcome = controller.initialize().await;
    assert!(matches!(
        outcome,
        InitOutcome::Ready {
            first_draw: DrawOutcome::Drawn(_),
            ..
        }
    ));
    assert!(matches!(controller.draw_card().await, DrawOutcome::Drawn(_)));
    assert!(matches!(controller.draw_card().await, DrawOutcome::Exhausted));

    let snapshot = controller.snapshot().await;
    let codes: Vec<_> = snapshot
        .drawn_cards
        .iter()
        .filter_map(|card: &Card| card.code.as_deref())
        .collect();
    assert_eq!(codes, vec!["KH", "2C"]);
    assert_eq!(snapshot.error.as_deref(), Some(EXHAUSTED_DECK_MESSAGE));
    assert_eq!(snapshot.remaining, Some(0));

    assert!(matches!(controller.shuffle().await, ShuffleOutcome::Shuffled));
    let snapshot = controller.snapshot().await;
    assert!(snapshot.drawn_cards.is_empty());
    assert!(snapshot.error.is_none());
    assert!(state.requests().contains(&"shuffle:abc123".to_string()));
}
