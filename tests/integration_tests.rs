// Integration tests for the Cinerino POS API routes

use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cinerino_pos_api::models::{
    EventSearchConditions, EventStatus, ScreeningEvent, TicketOffer, TicketOfferSearchConditions,
};
use cinerino_pos_api::routes::AppState;
use cinerino_pos_api::services::SearchResult;
use cinerino_pos_api::{configure_app, AppError, CinerinoError, ErrorKind, EventService};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the Cinerino API
#[derive(Default)]
struct StubEventService {
    events: Vec<ScreeningEvent>,
    offers: Vec<TicketOffer>,
    failure: Option<AppError>,
    searches: Mutex<Vec<EventSearchConditions>>,
}

#[async_trait]
impl EventService for StubEventService {
    async fn find_by_id(&self, id: &str) -> Result<ScreeningEvent, AppError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| CinerinoError::new(ErrorKind::NotFound, "Event not found").into())
    }

    async fn search(
        &self,
        conditions: &EventSearchConditions,
    ) -> Result<SearchResult<ScreeningEvent>, AppError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.searches.lock().unwrap().push(conditions.clone());
        Ok(SearchResult {
            data: self.events.clone(),
            total_count: None,
        })
    }

    async fn search_ticket_offers(
        &self,
        _conditions: &TicketOfferSearchConditions,
    ) -> Result<Vec<TicketOffer>, AppError> {
        Ok(self.offers.clone())
    }
}

fn create_test_event(id: &str) -> ScreeningEvent {
    serde_json::from_value(json!({
        "id": id,
        "startDate": "2024-01-01T01:00:00Z",
        "endDate": "2024-01-01T03:00:00Z",
        "eventStatus": "EventScheduled",
        "remainingAttendeeCapacity": 80,
        "additionalProperty": [{ "name": "tourNumber", "value": "101" }],
        "offers": { "seller": { "typeOf": "Corporation", "id": "seller-1" } },
        "aggregateOffer": {
            "offers": [
                { "id": "o-normal", "remainingAttendeeCapacity": 50 },
                { "id": "o-wheelchair", "remainingAttendeeCapacity": 1 }
            ]
        }
    }))
    .unwrap()
}

fn create_test_offers() -> Vec<TicketOffer> {
    serde_json::from_value(json!([
        {
            "id": "o-normal",
            "identifier": "001",
            "name": { "en": "Adult", "ja": "一般" },
            "priceSpecification": {
                "priceComponent": [{ "typeOf": "UnitPriceSpecification", "price": 1800 }]
            },
            "additionalProperty": [{ "name": "category", "value": "Normal" }]
        },
        {
            "id": "o-wheelchair",
            "identifier": "002",
            "name": { "en": "Wheelchair", "ja": "車椅子" },
            "priceSpecification": {
                "priceComponent": [{ "typeOf": "UnitPriceSpecification", "price": 1000 }]
            },
            "additionalProperty": [{ "name": "category", "value": "Wheelchair" }]
        }
    ]))
    .unwrap()
}

fn app_state(service: Arc<StubEventService>) -> web::Data<AppState> {
    web::Data::new(AppState {
        events: service,
        client_id: "pos-client".to_string(),
    })
}

#[actix_web::test]
async fn test_search_performances_returns_events_for_pos() {
    let service = Arc::new(StubEventService {
        events: vec![create_test_event("ev1")],
        offers: create_test_offers(),
        ..Default::default()
    });
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/performances?day=20240101").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let event = &body[0];
    assert_eq!(event["id"], "ev1");
    assert_eq!(event["attributes"]["day"], "20240101");
    assert_eq!(event["attributes"]["start_time"], "1000");
    assert_eq!(event["attributes"]["end_time"], "1200");
    assert_eq!(event["attributes"]["seat_status"], "50");
    assert_eq!(event["attributes"]["wheelchair_available"], 1);
    assert_eq!(event["attributes"]["tour_number"], "101");
    assert_eq!(event["attributes"]["online_sales_status"], "Normal");
    assert_eq!(event["attributes"]["ticket_types"][0]["id"], "001");
    assert_eq!(event["attributes"]["ticket_types"][0]["charge"], 1800);
    assert_eq!(event["attributes"]["ticket_types"][0]["available_num"], 50);
}

#[actix_web::test]
async fn test_query_parameters_reach_upstream_search() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(
        App::new()
            .app_data(app_state(service.clone()))
            .configure(configure_app),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/performances?page=2&limit=10&day=20240101")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!([]));

    let searches = service.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].page, 2);
    assert_eq!(searches[0].limit, 10);
    assert_eq!(
        searches[0].start_from.map(|d| d.with_timezone(&Utc)),
        Some("2023-12-31T15:00:00Z".parse::<DateTime<Utc>>().unwrap())
    );
}

#[actix_web::test]
async fn test_page_below_one_is_floored() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(
        App::new()
            .app_data(app_state(service.clone()))
            .configure(configure_app),
    )
    .await;

    let req = test::TestRequest::get().uri("/performances?page=-3").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let searches = service.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].page, 1);
}

#[actix_web::test]
async fn test_large_limit_is_forwarded() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(
        App::new()
            .app_data(app_state(service.clone()))
            .configure(configure_app),
    )
    .await;

    let req = test::TestRequest::get().uri("/performances?limit=200").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let searches = service.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].limit, 200);
}

#[actix_web::test]
async fn test_non_string_tour_number_is_omitted() {
    let event: ScreeningEvent = serde_json::from_value(json!({
        "id": "ev1",
        "startDate": "2024-01-01T01:00:00Z",
        "endDate": "2024-01-01T03:00:00Z",
        "eventStatus": "EventScheduled",
        "additionalProperty": [
            { "name": "tourNumber", "value": 101 },
            { "name": "note" }
        ]
    }))
    .unwrap();
    let service = Arc::new(StubEventService {
        events: vec![event],
        offers: create_test_offers(),
        ..Default::default()
    });
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/performances").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body[0]["id"], "ev1");
    assert!(body[0]["attributes"].get("tour_number").is_none());
    assert_eq!(body[0]["attributes"]["ticket_types"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn test_unknown_performance_is_404() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/performances?performanceId=missing").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["errors"][0]["reason"], "NotFound");
    assert_eq!(body["error"]["message"], "Event not found");
}

#[actix_web::test]
async fn test_upstream_failure_is_translated() {
    let service = Arc::new(StubEventService {
        failure: Some(AppError::Internal("connection refused".to_string())),
        ..Default::default()
    });
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/performances").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["errors"][0]["message"], "connection refused");
}

#[actix_web::test]
async fn test_invalid_day_is_400() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/performances?day=2024-01-01").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["errors"][0]["reason"], "Argument");
    assert_eq!(body["error"]["errors"][0]["argumentName"], "day");
}

#[actix_web::test]
async fn test_malformed_query_is_400() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/performances?page=abc").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);
}

#[actix_web::test]
async fn test_unmatched_route_is_404_without_errors() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/no/such/route").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": { "errors": [], "code": 404, "message": "" } }));
}

#[actix_web::test]
async fn test_health_check() {
    let service = Arc::new(StubEventService::default());
    let app = test::init_service(App::new().app_data(app_state(service)).configure(configure_app)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[::core::prelude::v1::test]
fn test_cancelled_event_deserializes() {
    let mut event = create_test_event("ev1");
    event.event_status = serde_json::from_value(json!("EventCancelled")).unwrap();
    assert_eq!(event.event_status, EventStatus::EventCancelled);
}
