//! Menu catalog and reservation API tests against a mock backend.

mod common;

use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use serde_json::json;

use kedai_client::api::types::ReservationRequest;
use kedai_core::TableId;

use common::harness;

#[tokio::test]
async fn menu_items_are_cached_per_category() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let all = server.mock(|when, then| {
        when.method(GET).path("/api/menu");
        then.status(200).json_body(json!([
            { "id": "M1", "name": "Latte", "price": 45000, "category": "coffee" }
        ]));
    });

    let first = h.api.menu_items(None).await.expect("menu fetch");
    let second = h.api.menu_items(None).await.expect("cached fetch");

    // Second call served from cache: one backend hit
    all.assert_hits(1);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert!(first.first().is_some_and(|item| item.available));
}

#[tokio::test]
async fn category_filter_is_a_distinct_cache_entry() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let all = server.mock(|when, then| {
        when.method(GET).path("/api/menu").query_param_exists("category");
        then.status(200).json_body(json!([
            { "id": "P1", "name": "Croissant", "price": 25000, "category": "pastry" }
        ]));
    });

    h.api
        .menu_items(Some("pastry"))
        .await
        .expect("filtered fetch");
    h.api
        .menu_items(Some("pastry"))
        .await
        .expect("cached filtered fetch");

    all.assert_hits(1);
}

#[tokio::test]
async fn invalidate_menu_forces_refetch() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let all = server.mock(|when, then| {
        when.method(GET).path("/api/menu");
        then.status(200).json_body(json!([]));
    });

    h.api.menu_items(None).await.expect("first fetch");
    h.api.invalidate_menu().await;
    h.api.menu_items(None).await.expect("refetch");

    all.assert_hits(2);
}

#[tokio::test]
async fn menu_categories_round_trip() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    server.mock(|when, then| {
        when.method(GET).path("/api/menu/categories");
        then.status(200).json_body(json!([
            { "id": "coffee", "name": "Coffee" },
            { "id": "pastry", "name": "Pastry" }
        ]));
    });

    let categories = h.api.menu_categories().await.expect("categories");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories.first().map(|c| c.id.as_str()), Some("coffee"));
}

#[tokio::test]
async fn create_reservation_posts_request_and_parses_confirmation() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/reservations")
            .json_body_includes(json!({ "tableId": "T3", "partySize": 4 }).to_string());
        then.status(201).json_body(json!({
            "id": "res-1",
            "tableId": "T3",
            "name": "Ari",
            "partySize": 4,
            "reservedAt": "2025-11-02T18:00:00Z"
        }));
    });

    let reservation = h
        .api
        .create_reservation(&ReservationRequest {
            table_id: TableId::new("T3"),
            name: "Ari".to_string(),
            phone: "+62-812-0000".to_string(),
            party_size: 4,
            reserved_at: Utc.with_ymd_and_hms(2025, 11, 2, 18, 0, 0).single().expect("valid time"),
        })
        .await
        .expect("reservation created");

    create.assert();
    assert_eq!(reservation.id.as_str(), "res-1");
    assert_eq!(reservation.party_size, 4);
}

#[tokio::test]
async fn tables_listing_parses_status() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    server.mock(|when, then| {
        when.method(GET).path("/api/tables");
        then.status(200).json_body(json!([
            { "id": "T1", "number": 1, "capacity": 2, "status": "available" },
            { "id": "T2", "number": 2, "capacity": 4, "status": "occupied" }
        ]));
    });

    let tables = h.api.tables().await.expect("tables");
    assert_eq!(tables.len(), 2);
    assert_eq!(
        tables.first().map(|t| t.status),
        Some(kedai_client::api::types::TableStatus::Available)
    );
}
