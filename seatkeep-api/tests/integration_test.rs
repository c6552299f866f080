use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use seatkeep_api::{app, AppState};
use seatkeep_core::{Hold, SeatRange};
use seatkeep_engine::TicketService;
use seatkeep_store::Settings;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

const EMAIL: &str = "test@email.com";

fn test_app() -> (Router, Arc<TicketService>) {
    let tickets = Arc::new(TicketService::new(&Settings::default()).unwrap());
    (app(AppState::new(tickets.clone())), tickets)
}

async fn send(app: &Router, method: &str, uri: &str, customer: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = customer {
        builder = builder.header("customer", email);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_seat_map_reports_availability() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/tickets/map", None).await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("Seats Available: 297\n\nrow\t0\t1\t"));
    assert_eq!(text.lines().count(), 2 + 1 + 9);
}

#[tokio::test]
async fn test_hold_then_reserve_flow() {
    let (app, tickets) = test_app();

    let (status, body) = send(&app, "GET", "/tickets/request?num_seats=2", Some(EMAIL)).await;
    assert_eq!(status, StatusCode::OK);
    let hold: Hold = serde_json::from_slice(&body).unwrap();
    assert_eq!(hold.seats, SeatRange::new(0, 16, 17));
    assert_eq!(hold.customer_email, EMAIL);

    let (status, body) = send(&app, "GET", &format!("/tickets/{}", hold.id), Some(EMAIL)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Hold>(&body).unwrap(), hold);

    let (status, body) = send(&app, "POST", &format!("/tickets/{}/reserve", hold.id), Some(EMAIL)).await;
    assert_eq!(status, StatusCode::OK);
    let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let code = reply["confirmation_code"].as_str().unwrap();
    assert_eq!(code.len(), 36);
    assert!(tickets.get_reservations().contains_key(code));

    let (status, body) = send(&app, "GET", "/admin/reservations", None).await;
    assert_eq!(status, StatusCode::OK);
    let reservations: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reservations[code]["customer_email"], EMAIL);

    let (status, _) = send(&app, "GET", &format!("/tickets/{}", hold.id), Some(EMAIL)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_query_parameter_name() {
    let (app, _) = test_app();
    let (status, _) = send(&app, "GET", "/tickets/request?numSeats=1", Some(EMAIL)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_errors() {
    let (app, tickets) = test_app();

    let (status, body) = send(&app, "GET", "/tickets/request?num_seats=0", Some(EMAIL)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("at least one"));

    let (status, _) = send(&app, "GET", "/tickets/request?num_seats=34", Some(EMAIL)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "GET", "/tickets/request?num_seats=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(tickets.num_seats_available(), 297);
}

#[tokio::test]
async fn test_malformed_parameters_return_json_errors() {
    let (app, tickets) = test_app();

    for uri in [
        "/tickets/request?num_seats=abc",
        "/tickets/request?num_seats=99999999999",
        "/tickets/request",
        "/tickets/x",
        "/tickets/-4",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(EMAIL)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].is_string(), "{}", uri);
    }

    let (status, body) = send(&app, "POST", "/tickets/abc/reserve", Some(EMAIL)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(serde_json::from_slice::<serde_json::Value>(&body).unwrap()["error"].is_string());

    assert_eq!(tickets.num_seats_available(), 297);
}

#[tokio::test]
async fn test_wrong_customer_cannot_touch_hold() {
    let (app, tickets) = test_app();
    let hold = tickets.find_and_hold_seats(3, EMAIL).unwrap();

    let (status, _) = send(&app, "POST", &format!("/tickets/{}/reserve", hold.id), Some("thief@email.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/tickets/{}/cancel", hold.id), Some("thief@email.com")).await;
    assert_eq!(status, StatusCode::OK);
    let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["cancelled"], false);

    assert_eq!(tickets.get_holds().len(), 1);
}

#[tokio::test]
async fn test_cancel_and_admin_holds() {
    let (app, tickets) = test_app();
    let hold = tickets.find_and_hold_seats(2, EMAIL).unwrap();

    let (_, body) = send(&app, "GET", "/admin/holds", None).await;
    let holds: HashMap<String, Hold> = serde_json::from_slice(&body).unwrap();
    assert_eq!(holds.get(&hold.id.to_string()), Some(&hold));

    let (status, body) = send(&app, "DELETE", &format!("/tickets/{}/cancel", hold.id), Some("TEST@email.com")).await;
    assert_eq!(status, StatusCode::OK);
    let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["cancelled"], true);

    let (_, body) = send(&app, "GET", "/admin/holds", None).await;
    let holds: HashMap<String, Hold> = serde_json::from_slice(&body).unwrap();
    assert!(holds.is_empty());
    assert_eq!(tickets.num_seats_available(), 297);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}
