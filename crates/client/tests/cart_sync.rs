//! Cart store synchronization tests against a mock backend.
//!
//! These cover the store's core contract: write-after-confirm mutations,
//! no duplicate lines, the quantity floor, the initialize fallback, derived
//! totals, and snapshot round-trips.

mod common;

use httpmock::prelude::*;
use serde_json::json;

use kedai_client::persist::{SnapshotStore, namespaces};
use kedai_client::store::CartStore;
use kedai_core::{ItemId, Price};

use common::{Harness, harness};

fn latte() -> kedai_client::api::types::MenuItem {
    kedai_client::api::types::MenuItem {
        id: ItemId::new("M1"),
        name: "Latte".to_string(),
        price: Price::from_major(45_000),
        category: Some("coffee".to_string()),
        description: None,
        available: true,
    }
}

fn cart_store(h: &Harness) -> CartStore {
    CartStore::new(h.api.clone(), h.storage.clone(), h.notifier.clone())
}

/// Preload the persisted cart snapshot the way a previous run would have
/// left it.
fn seed_cart(h: &Harness, items: serde_json::Value, session_id: &str) {
    let snapshot = json!({ "items": items, "sessionId": session_id });
    h.storage
        .save(namespaces::CART, &snapshot.to_string())
        .expect("seed cart snapshot");
}

fn seeded_latte_line(quantity: u32) -> serde_json::Value {
    json!({
        "id": "row-1",
        "itemId": "M1",
        "name": "Latte",
        "price": 45000,
        "quantity": quantity,
        "note": ""
    })
}

#[tokio::test]
async fn fresh_session_generates_id_and_fetches_cart_once() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let get_cart = server.mock(|when, then| {
        when.method(GET)
            .path("/api/cart")
            .query_param_exists("sessionId");
        then.status(200).json_body(json!([]));
    });

    let cart = cart_store(&h);
    assert_eq!(cart.session_id(), None);

    cart.initialize().await;

    // Exactly one GET was issued
    get_cart.assert_hits(1);

    // Generated identifier matches session_<digits>_<alnum>
    let session_id = cart.session_id().expect("session id generated");
    let mut parts = session_id.as_str().splitn(3, '_');
    assert_eq!(parts.next(), Some("session"));
    assert!(
        parts
            .next()
            .expect("timestamp part")
            .chars()
            .all(|c| c.is_ascii_digit())
    );
    assert!(
        parts
            .next()
            .expect("random part")
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    );

    // And it was persisted
    let raw = h
        .storage
        .load(namespaces::CART)
        .expect("load")
        .expect("snapshot written");
    assert!(raw.contains(session_id.as_str()));
}

#[tokio::test]
async fn initialize_overwrites_local_items_with_server_cart() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    server.mock(|when, then| {
        when.method(GET)
            .path("/api/cart")
            .query_param("sessionId", "session_1_seeded99");
        then.status(200).json_body(json!([{
            "id": "row-9",
            "itemId": "M2",
            "name": "Espresso",
            "price": 30000,
            "quantity": 1,
            "note": ""
        }]));
    });

    let cart = cart_store(&h);
    cart.initialize().await;

    // Authoritative overwrite: no merge with the pre-existing local line
    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|l| l.item_id.as_str()), Some("M2"));
}

#[tokio::test]
async fn initialize_keeps_local_items_when_fetch_fails() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    server.mock(|when, then| {
        when.method(GET).path("/api/cart");
        then.status(500).json_body(json!({ "message": "boom" }));
    });

    let cart = cart_store(&h);
    cart.initialize().await;

    // Fallback-to-cache: the seeded line survives
    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|l| l.quantity), Some(2));
    assert!(!cart.is_loading());
}

#[tokio::test]
async fn add_to_cart_appends_server_confirmed_line() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/api/cart")
            .json_body_includes(json!({ "itemId": "M1", "quantity": 1, "note": "" }).to_string());
        then.status(201).json_body(json!({
            "id": "row-1",
            "itemId": "M1",
            "name": "Latte",
            "price": 45000,
            "quantity": 1,
            "note": ""
        }));
    });

    let cart = cart_store(&h);
    let outcome = cart.add_to_cart(&latte(), 1).await;

    add.assert();
    assert!(outcome.success);

    let items = cart.items();
    assert_eq!(items.len(), 1);
    let line = items.first().expect("one line");
    assert_eq!(line.id.as_str(), "row-1");
    assert_eq!(line.name, "Latte");
    assert_eq!(line.quantity, 1);

    // Success notification names the item
    assert!(h.notifier.successes().iter().any(|m| m.contains("Latte")));
}

#[tokio::test]
async fn add_to_cart_failure_leaves_cart_untouched() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    server.mock(|when, then| {
        when.method(POST).path("/api/cart");
        then.status(400).json_body(json!({ "message": "Item unavailable" }));
    });

    let cart = cart_store(&h);
    let outcome = cart.add_to_cart(&latte(), 1).await;

    // No optimistic line: addition is server-confirmed only
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Item unavailable"));
    assert!(cart.items().is_empty());
    assert_eq!(h.notifier.errors(), vec!["Item unavailable".to_string()]);
    assert!(!cart.is_loading());
}

#[tokio::test]
async fn repeated_add_merges_into_single_line() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let add = server.mock(|when, then| {
        when.method(POST).path("/api/cart");
        then.status(201).json_body(json!({
            "id": "row-1",
            "itemId": "M1",
            "name": "Latte",
            "price": 45000,
            "quantity": 1,
            "note": ""
        }));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/cart/row-1")
            .json_body(json!({ "quantity": 3 }));
        then.status(200).json_body(json!({
            "id": "row-1",
            "itemId": "M1",
            "name": "Latte",
            "price": 45000,
            "quantity": 3,
            "note": ""
        }));
    });

    let cart = cart_store(&h);
    assert!(cart.add_to_cart(&latte(), 1).await.success);
    assert!(cart.add_to_cart(&latte(), 2).await.success);

    // One POST for the first add, one PUT with the summed quantity
    add.assert_hits(1);
    update.assert_hits(1);

    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|l| l.quantity), Some(3));
}

#[tokio::test]
async fn update_quantity_zero_issues_removal_not_update() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    let update = server.mock(|when, then| {
        when.method(PUT).path("/api/cart/row-1");
        then.status(200).json_body(json!({}));
    });
    let remove = server.mock(|when, then| {
        when.method(DELETE).path("/api/cart/row-1");
        then.status(204);
    });

    let cart = cart_store(&h);
    let outcome = cart.update_quantity(&ItemId::new("M1"), 0).await;

    assert!(outcome.success);
    remove.assert_hits(1);
    update.assert_hits(0);
    assert!(cart.get(&ItemId::new("M1")).is_none());
}

#[tokio::test]
async fn update_quantity_failure_leaves_state_unchanged() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    server.mock(|when, then| {
        when.method(PUT).path("/api/cart/row-1");
        then.status(500).json_body(json!({ "message": "Update failed" }));
    });

    let cart = cart_store(&h);
    let before = cart.items();
    let outcome = cart.update_quantity(&ItemId::new("M1"), 5).await;

    assert!(!outcome.success);
    assert_eq!(cart.items(), before);
    assert!(!cart.is_loading());
}

#[tokio::test]
async fn add_then_remove_leaves_empty_cart_and_zero_total() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    let add = server.mock(|when, then| {
        when.method(POST).path("/api/cart");
        then.status(201).json_body(json!({
            "id": "row-1",
            "itemId": "M1",
            "name": "Latte",
            "price": 45000,
            "quantity": 1,
            "note": ""
        }));
    });
    let remove = server.mock(|when, then| {
        when.method(DELETE).path("/api/cart/row-1");
        then.status(204);
    });

    let cart = cart_store(&h);
    assert!(cart.add_to_cart(&latte(), 1).await.success);
    assert!(cart.remove_from_cart(&ItemId::new("M1")).await.success);

    add.assert_hits(1);
    remove.assert_hits(1);
    assert!(cart.items().is_empty());
    assert_eq!(cart.total(), Price::zero());
    assert_eq!(cart.item_count(), 0);
}

#[tokio::test]
async fn remove_failure_keeps_line() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(1)]), "session_1_seeded99");

    server.mock(|when, then| {
        when.method(DELETE).path("/api/cart/row-1");
        then.status(500).json_body(json!({ "message": "nope" }));
    });

    let cart = cart_store(&h);
    assert!(!cart.remove_from_cart(&ItemId::new("M1")).await.success);
    assert_eq!(cart.items().len(), 1);
}

#[tokio::test]
async fn clear_cart_empties_items_on_success_only() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    let clear = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/cart/clear")
            .query_param("sessionId", "session_1_seeded99");
        then.status(204);
    });

    let cart = cart_store(&h);
    assert!(cart.clear().await.success);
    clear.assert();
    assert!(cart.items().is_empty());
}

#[tokio::test]
async fn clear_cart_failure_retains_items() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    server.mock(|when, then| {
        when.method(DELETE).path("/api/cart/clear");
        then.status(500).json_body(json!({ "message": "nope" }));
    });

    let cart = cart_store(&h);
    assert!(!cart.clear().await.success);
    assert_eq!(cart.items().len(), 1);
}

#[tokio::test]
async fn note_update_sends_note_only_and_mirrors_locally() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(1)]), "session_1_seeded99");

    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/cart/row-1")
            .json_body(json!({ "note": "less sugar" }));
        then.status(200).json_body(json!({
            "id": "row-1",
            "itemId": "M1",
            "name": "Latte",
            "price": 45000,
            "quantity": 1,
            "note": "less sugar"
        }));
    });

    let cart = cart_store(&h);
    let outcome = cart.update_item_note(&ItemId::new("M1"), "less sugar").await;

    update.assert();
    assert!(outcome.success);
    assert_eq!(
        cart.get(&ItemId::new("M1")).map(|l| l.note),
        Some("less sugar".to_string())
    );
}

#[tokio::test]
async fn derived_totals_follow_items() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(
        &h,
        json!([
            seeded_latte_line(2),
            {
                "id": "row-2",
                "itemId": "M2",
                "name": "Croissant",
                "price": 25000,
                "quantity": 3,
                "note": ""
            }
        ]),
        "session_1_seeded99",
    );

    let cart = cart_store(&h);
    assert_eq!(cart.total(), Price::from_major(2 * 45_000 + 3 * 25_000));
    assert_eq!(cart.item_count(), 5);
    assert_eq!(
        cart.get(&ItemId::new("M2")).map(|l| l.name),
        Some("Croissant".to_string())
    );
}

#[tokio::test]
async fn snapshot_round_trip_reproduces_state() {
    let server = MockServer::start();
    let h = harness(&server.base_url());

    server.mock(|when, then| {
        when.method(POST).path("/api/cart");
        then.status(201).json_body(json!({
            "id": "row-1",
            "itemId": "M1",
            "name": "Latte",
            "price": 45000,
            "quantity": 1,
            "note": ""
        }));
    });

    let cart = cart_store(&h);
    assert!(cart.add_to_cart(&latte(), 1).await.success);
    let items_before = cart.items();
    let session_before = cart.session_id();
    drop(cart);

    // A fresh store over the same storage restores the identical slice
    let restored = cart_store(&h);
    assert_eq!(restored.items(), items_before);
    assert_eq!(restored.session_id(), session_before);
    assert!(!restored.is_loading());
}

#[tokio::test]
async fn checkout_empties_cart_only_on_success() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    let order = server.mock(|when, then| {
        when.method(POST)
            .path("/api/orders")
            .json_body_includes(json!({ "sessionId": "session_1_seeded99" }).to_string());
        then.status(201).json_body(json!({
            "id": "order-1",
            "status": "pending",
            "total": 90000,
            "createdAt": "2025-11-02T09:30:00Z"
        }));
    });

    let cart = cart_store(&h);
    let outcome = cart
        .checkout(None, &kedai_client::api::types::CheckoutDetails::default())
        .await;

    order.assert();
    assert!(outcome.success);
    assert!(cart.items().is_empty());
}

#[tokio::test]
async fn checkout_failure_retains_cart() {
    let server = MockServer::start();
    let h = harness(&server.base_url());
    seed_cart(&h, json!([seeded_latte_line(2)]), "session_1_seeded99");

    server.mock(|when, then| {
        when.method(POST).path("/api/orders");
        then.status(500).json_body(json!({ "message": "Kitchen closed" }));
    });

    let cart = cart_store(&h);
    let outcome = cart
        .checkout(None, &kedai_client::api::types::CheckoutDetails::default())
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Kitchen closed"));
    assert_eq!(cart.items().len(), 1);
}
