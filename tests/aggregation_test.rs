mod common;

use async_trait::async_trait;
use common::{logged_in_session, quote, quote_json, quote_request};
use serde_json::json;
use sigorta_client::http::{
    ApiClient, ClientError, PolicyCreationRequest, PolicyRecord, QuoteRequest, QuoteResponse,
};
use sigorta_client::providers::QuoteService;
use sigorta_client::services::{BoardState, QuoteBoard, QuoteMode, Resolution};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// "req_slow" isteği kapı açılana kadar bekler, diğerleri hemen döner.
struct GatedService {
    gate: Notify,
    calls: Mutex<Vec<String>>,
}

impl GatedService {
    fn new() -> Self {
        Self {
            gate: Notify::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QuoteService for GatedService {
    async fn request_single(
        &self,
        provider: &str,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", provider, request.quote_meta.request_id));
        Ok(quote("Sompo", 1800.0, &[1], Some(900)))
    }

    async fn request_all(&self, request: &QuoteRequest) -> Result<Vec<QuoteResponse>, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(request.quote_meta.request_id.clone());

        if request.quote_meta.request_id == "req_slow" {
            self.gate.notified().await;
            return Ok(vec![quote("Eski", 100.0, &[1], None)]);
        }
        Ok(vec![quote("Sompo", 1500.0, &[1], None), quote("Quick", 1200.0, &[1], None)])
    }

    async fn create_policy(&self, _: &PolicyCreationRequest) -> Result<PolicyRecord, ClientError> {
        unreachable!("bu testte poliçe kesilmez")
    }
}

#[tokio::test]
async fn second_submission_wins_over_late_first() {
    let service = GatedService::new();
    let board = QuoteBoard::new();
    let slow = quote_request("req_slow");
    let fast = quote_request("req_fast");

    let (first, second) = tokio::join!(
        board.submit(&service, &QuoteMode::Compare, &slow),
        async {
            let resolution = board.submit(&service, &QuoteMode::Compare, &fast).await;
            service.gate.notify_one();
            resolution
        }
    );

    assert_eq!(second, Resolution::Applied);
    assert_eq!(first, Resolution::Stale);

    let companies: Vec<String> = board.quotes().into_iter().map(|q| q.company).collect();
    assert_eq!(companies, vec!["Sompo", "Quick"]);
    assert_eq!(*service.calls.lock().unwrap(), vec!["req_slow", "req_fast"]);
}

#[tokio::test]
async fn single_mode_wraps_result() {
    let service = GatedService::new();
    let board = QuoteBoard::new();

    let resolution = board
        .submit(&service, &QuoteMode::Single("sompo".to_string()), &quote_request("req_1"))
        .await;

    assert_eq!(resolution, Resolution::Applied);
    assert_eq!(board.quotes().len(), 1);
    assert_eq!(*service.calls.lock().unwrap(), vec!["sompo:req_1"]);
}

#[tokio::test]
async fn stale_http_response_is_ignored() {
    let server = MockServer::start().await;
    let (session, _, _) = logged_in_session("t");
    let api = ApiClient::with_base_url(&server.uri(), Duration::from_secs(5), session).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/quote"))
        .and(body_partial_json(json!({ "quoteMeta": { "requestId": "req_slow" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([quote_json("Eski", 100.0)]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/quote"))
        .and(body_partial_json(json!({ "quoteMeta": { "requestId": "req_fast" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([quote_json("Axa", 990.0), quote_json("Sompo", 1500.0)])),
        )
        .mount(&server)
        .await;

    let board = QuoteBoard::new();
    let slow = quote_request("req_slow");
    let fast = quote_request("req_fast");

    let (first, second) = tokio::join!(
        board.submit(&api, &QuoteMode::Compare, &slow),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            board.submit(&api, &QuoteMode::Compare, &fast).await
        }
    );

    assert_eq!(first, Resolution::Stale);
    assert_eq!(second, Resolution::Applied);

    let cheapest = board.with_comparison(|c| c.cheapest().company.clone());
    assert_eq!(cheapest.as_deref(), Some("Axa"));
}

#[tokio::test]
async fn failure_is_shown_on_board() {
    let server = MockServer::start().await;
    let (session, _, _) = logged_in_session("t");
    let api = ApiClient::with_base_url(&server.uri(), Duration::from_secs(5), session).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/quote"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": "UNKNOWN", "message": "Hiç teklif alınamadı" }
        })))
        .mount(&server)
        .await;

    let board = QuoteBoard::new();
    board.submit(&api, &QuoteMode::Compare, &quote_request("req_1")).await;

    match board.state() {
        BoardState::Failed(e) => assert_eq!(e.to_string(), "Hiç teklif alınamadı"),
        other => panic!("beklenmeyen durum: {:?}", other),
    }
    assert!(!board.is_loading());
}

#[tokio::test]
async fn expired_session_leaves_board_empty() {
    let server = MockServer::start().await;
    let (session, _, nav) = logged_in_session("t");
    let api = ApiClient::with_base_url(&server.uri(), Duration::from_secs(5), session).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/quote"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let board = QuoteBoard::new();
    board.submit(&api, &QuoteMode::Compare, &quote_request("req_1")).await;

    assert!(matches!(board.state(), BoardState::Empty));
    assert_eq!(nav.visits(), vec!["/login".to_string()]);
}
