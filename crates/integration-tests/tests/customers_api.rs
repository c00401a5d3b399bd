//! Integration tests for the customer API.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p solsage-api)
//!
//! Run with: cargo test -p solsage-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the customer API (configurable via environment).
fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A throwaway email that cannot collide across test runs.
fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// Test helper: create a customer and return the response body.
async fn create_test_customer(client: &Client, payload: &Value) -> Value {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/customers"))
        .json(payload)
        .send()
        .await
        .expect("Failed to create test customer");

    assert_eq!(resp.status(), StatusCode::OK, "create should succeed");
    resp.json().await.expect("Failed to parse create response")
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to get /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to get /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Create Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_with_nested_address() {
    let client = client();
    let email = unique_email();

    let body = create_test_customer(
        &client,
        &json!({
            "first_name": "Maria",
            "last_name": "Sonne",
            "email": email,
            "electricity_usage_kwh": 4500,
            "old_roof": true,
            "property_address": {
                "street": "Sonnenallee 12",
                "city": "Berlin",
                "postal_code": "12045",
                "state_code": "BE"
            }
        }),
    )
    .await;

    assert!(body.get("id").and_then(Value::as_str).is_some());
    assert_eq!(body["first_name"], "Maria");
    assert_eq!(body["email"], Value::String(email));
    assert_eq!(body["electricity_usage_kwh"], 4500);
    assert_eq!(body["old_roof"], true);

    // Address is embedded as a plain object, without ownership keys.
    let address = body["property_address"]
        .as_object()
        .expect("address should be embedded");
    assert_eq!(address["street"], "Sonnenallee 12");
    assert_eq!(address["postal_code"], "12045");
    assert!(!address.contains_key("id"));
    assert!(!address.contains_key("customer_id"));
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_without_address() {
    let client = client();

    let body = create_test_customer(
        &client,
        &json!({
            "first_name": "Jonas",
            "last_name": "Dach",
            "email": unique_email()
        }),
    )
    .await;

    assert_eq!(body["property_address"], Value::Null);
    assert_eq!(body["electricity_usage_kwh"], Value::Null);
    assert_eq!(body["old_roof"], Value::Null);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_missing_required_fields() {
    let client = client();
    let base_url = api_base_url();

    for payload in [
        json!({}),
        json!({"first_name": "Maria", "last_name": "Sonne"}),
        json!({"first_name": "Maria", "email": unique_email()}),
        // Present but blank counts as missing.
        json!({"first_name": "  ", "last_name": "Sonne", "email": unique_email()}),
    ] {
        let resp = client
            .post(format!("{base_url}/customers"))
            .json(&payload)
            .send()
            .await
            .expect("Failed to post customer");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        let text = resp.text().await.expect("Failed to read body");
        assert_eq!(text, "first_name, last_name and email are required");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_invalid_email_shapes() {
    let client = client();
    let base_url = api_base_url();

    for email in ["plainaddress", "a@domain.com", "user+tag@example.com", "a@b@c.com"] {
        let resp = client
            .post(format!("{base_url}/customers"))
            .json(&json!({
                "first_name": "Maria",
                "last_name": "Sonne",
                "email": email
            }))
            .send()
            .await
            .expect("Failed to post customer");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "email: {email}");
        let text = resp.text().await.expect("Failed to read body");
        assert_eq!(text, "invalid email address - expected something like abc@xyz.com");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_duplicate_email_conflicts() {
    let client = client();
    let base_url = api_base_url();
    let email = unique_email();

    create_test_customer(
        &client,
        &json!({"first_name": "Maria", "last_name": "Sonne", "email": email}),
    )
    .await;

    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({"first_name": "Other", "last_name": "Person", "email": email}))
        .send()
        .await
        .expect("Failed to post duplicate");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let text = resp.text().await.expect("Failed to read body");
    assert_eq!(text, "email already taken");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_rejects_loose_scalar_types() {
    let client = client();
    let base_url = api_base_url();

    // Numeric strings, floats and booleans are not integers.
    for usage in [json!("4500"), json!(4500.5), json!(true)] {
        let resp = client
            .post(format!("{base_url}/customers"))
            .json(&json!({
                "first_name": "Maria",
                "last_name": "Sonne",
                "email": unique_email(),
                "electricity_usage_kwh": usage
            }))
            .send()
            .await
            .expect("Failed to post customer");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let text = resp.text().await.expect("Failed to read body");
        assert_eq!(text, "electricity_usage_kwh must be an integer");
    }

    // 0/1 and strings are not booleans.
    for roof in [json!(1), json!(0), json!("true")] {
        let resp = client
            .post(format!("{base_url}/customers"))
            .json(&json!({
                "first_name": "Maria",
                "last_name": "Sonne",
                "email": unique_email(),
                "old_roof": roof
            }))
            .send()
            .await
            .expect("Failed to post customer");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let text = resp.text().await.expect("Failed to read body");
        assert_eq!(text, "old_roof must be a boolean");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_duplicate_email_reported_before_type_errors() {
    let client = client();
    let base_url = api_base_url();
    let email = unique_email();

    create_test_customer(
        &client,
        &json!({"first_name": "Erik", "last_name": "Erste", "email": email}),
    )
    .await;

    // The payload carries two defects; the uniqueness conflict is checked
    // first and wins over the type error.
    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({
            "first_name": "Emma",
            "last_name": "Zweite",
            "email": email,
            "electricity_usage_kwh": "4500"
        }))
        .send()
        .await
        .expect("Failed to post customer");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let text = resp.text().await.expect("Failed to read body");
    assert_eq!(text, "email already taken");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_type_errors_reported_before_postal_code() {
    let client = client();
    let base_url = api_base_url();

    // Bad usage type AND bad nested postal code: the type check wins.
    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({
            "first_name": "Nora",
            "last_name": "Beides",
            "email": unique_email(),
            "electricity_usage_kwh": "not a number",
            "property_address": {"postal_code": "12"}
        }))
        .send()
        .await
        .expect("Failed to post customer");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let text = resp.text().await.expect("Failed to read body");
    assert_eq!(text, "electricity_usage_kwh must be an integer");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_create_invalid_postal_code_writes_nothing() {
    let client = client();
    let base_url = api_base_url();
    let email = unique_email();

    let resp = client
        .post(format!("{base_url}/customers"))
        .json(&json!({
            "first_name": "Maria",
            "last_name": "Sonne",
            "email": email,
            "property_address": {"postal_code": "1204"}
        }))
        .send()
        .await
        .expect("Failed to post customer");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let text = resp.text().await.expect("Failed to read body");
    assert_eq!(text, "invalid postal code: must be exactly 5 digits");

    // The rejected create must not have left the customer row behind:
    // the same email is still free.
    create_test_customer(
        &client,
        &json!({"first_name": "Maria", "last_name": "Sonne", "email": email}),
    )
    .await;
}

// ============================================================================
// Read & List Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_get_customer_roundtrip() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({
            "first_name": "Lena",
            "last_name": "Feld",
            "email": unique_email(),
            "property_address": {"street": "Feldweg 3", "postal_code": "80331"}
        }),
    )
    .await;
    let id = created["id"].as_str().expect("id should be a string");

    let resp = client
        .get(format!("{base_url}/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body, created);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_get_unknown_and_malformed_ids() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/customers/{}", Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to get unknown customer");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A malformed id cannot name any customer: same 404.
    let resp = client
        .get(format!("{base_url}/customers/not-a-uuid"))
        .send()
        .await
        .expect("Failed to get malformed id");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_list_contains_created_customer() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Kai", "last_name": "Strom", "email": unique_email()}),
    )
    .await;

    let resp = client
        .get(format!("{base_url}/customers"))
        .send()
        .await
        .expect("Failed to list customers");
    assert_eq!(resp.status(), StatusCode::OK);

    let list: Vec<Value> = resp.json().await.expect("Failed to parse list");
    let entry = list
        .iter()
        .find(|c| c["id"] == created["id"])
        .expect("created customer should be listed");

    // Summaries carry no embedded address.
    assert!(!entry.as_object().expect("entry").contains_key("property_address"));
}

// ============================================================================
// Patch Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_scalar_fields() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Tim", "last_name": "Alt", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({"last_name": "Neu", "electricity_usage_kwh": 3200, "old_roof": false}))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["first_name"], "Tim");
    assert_eq!(body["last_name"], "Neu");
    assert_eq!(body["electricity_usage_kwh"], 3200);
    assert_eq!(body["old_roof"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_ignores_unknown_and_id_keys() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Ida", "last_name": "West", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({
            "id": Uuid::new_v4(),
            "role": "admin",
            "first_name": "Ada"
        }))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    // The allow-listed field applied, the id stayed put.
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["id"], created["id"]);
    assert!(!body.as_object().expect("body").contains_key("role"));
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_email_to_own_value_is_not_a_conflict() {
    let client = client();
    let base_url = api_base_url();
    let email = unique_email();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Eva", "last_name": "Gleich", "email": email}),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({"email": email}))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_email_to_other_customers_value_conflicts() {
    let client = client();
    let base_url = api_base_url();
    let taken = unique_email();

    create_test_customer(
        &client,
        &json!({"first_name": "Nils", "last_name": "Erste", "email": taken}),
    )
    .await;
    let created = create_test_customer(
        &client,
        &json!({"first_name": "Finn", "last_name": "Zweite", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({"email": taken}))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_unknown_customer() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .patch(format!("{base_url}/customers/{}", Uuid::new_v4()))
        .json(&json!({"first_name": "Ghost"}))
        .send()
        .await
        .expect("Failed to patch unknown customer");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_is_idempotent() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Ole", "last_name": "Zwei", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");
    let patch = json!({"first_name": "Olaf", "property_address": {"city": "Hamburg"}});

    let first: Value = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&patch)
        .send()
        .await
        .expect("Failed first patch")
        .json()
        .await
        .expect("Failed to parse first patch");

    let second: Value = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&patch)
        .send()
        .await
        .expect("Failed second patch")
        .json()
        .await
        .expect("Failed to parse second patch");

    assert_eq!(first, second);
}

// ============================================================================
// Address Reconciliation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_creates_address_when_absent() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Mia", "last_name": "Ohne", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");
    assert_eq!(created["property_address"], Value::Null);

    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({"property_address": {"street": "Neuer Weg 1", "postal_code": "50667"}}))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["property_address"]["street"], "Neuer Weg 1");
    assert_eq!(body["property_address"]["postal_code"], "50667");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_merges_into_existing_address() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({
            "first_name": "Paul",
            "last_name": "Merge",
            "email": unique_email(),
            "property_address": {
                "street": "Alte Gasse 9",
                "city": "Koeln",
                "postal_code": "50667",
                "state_code": "NW"
            }
        }),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    // Only the city changes; untouched fields must survive.
    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({"property_address": {"city": "Bonn"}}))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let address = &body["property_address"];
    assert_eq!(address["city"], "Bonn");
    assert_eq!(address["street"], "Alte Gasse 9");
    assert_eq!(address["postal_code"], "50667");
    assert_eq!(address["state_code"], "NW");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_repeated_address_patches_keep_one_address() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Rita", "last_name": "Eins", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    for postal_code in ["10115", "20095", "80331"] {
        let resp = client
            .patch(format!("{base_url}/customers/{id}"))
            .json(&json!({"property_address": {"postal_code": postal_code}}))
            .send()
            .await
            .expect("Failed to patch customer");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // The read-model always embeds at most one address, and it holds the
    // last reconciled values.
    let body: Value = client
        .get(format!("{base_url}/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer")
        .json()
        .await
        .expect("Failed to parse body");

    assert!(body["property_address"].is_object());
    assert_eq!(body["property_address"]["postal_code"], "80331");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_patch_invalid_postal_code_leaves_customer_untouched() {
    let client = client();
    let base_url = api_base_url();

    let created = create_test_customer(
        &client,
        &json!({"first_name": "Sven", "last_name": "Fest", "email": unique_email()}),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    // A bad nested postal code must abort the whole patch, including the
    // scalar rename riding along in the same payload.
    let resp = client
        .patch(format!("{base_url}/customers/{id}"))
        .json(&json!({
            "first_name": "Soeren",
            "property_address": {"postal_code": "abcde"}
        }))
        .send()
        .await
        .expect("Failed to patch customer");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = client
        .get(format!("{base_url}/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer")
        .json()
        .await
        .expect("Failed to parse body");

    assert_eq!(body["first_name"], "Sven");
    assert_eq!(body["property_address"], Value::Null);
}
