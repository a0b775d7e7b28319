mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};
use support::{admin_token, user_token, TestApp};

const BARBER_ID: &str = "8c1f2b1e-2f0a-4c47-9a51-6a1f0f1d2e3b";

fn appointment(barber_id: &str) -> Value {
    json!({
        "name": "Fade",
        "start": "2025-03-01T10:00:00Z",
        "minutesDuration": 45,
        "price": 20.5,
        "barberId": barber_id,
        "clientEmail": "client@example.com"
    })
}

#[tokio::test]
async fn create_and_fetch_appointment() {
    let app = TestApp::new();
    let token = user_token();

    let created = app.post("/appointment", &token, appointment(BARBER_ID)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let record = &created.body["appointment"];
    assert_eq!(record["barberId"], BARBER_ID);
    assert_eq!(record["minutesDuration"], 45);
    assert_eq!(record["price"], 20.5);
    assert_eq!(record["clientEmail"], "client@example.com");
    let id = record["id"].as_str().expect("id").to_string();

    let fetched = app.get(&format!("/appointment/{id}"), &token).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, *record);

    let listed = app.get("/appointment", &token).await;
    assert_eq!(listed.body, json!([record]));
}

#[tokio::test]
async fn short_duration_is_rejected() {
    let app = TestApp::new();
    let mut body = appointment(BARBER_ID);
    body["minutesDuration"] = json!(20);

    let response = app.post("/appointment", &admin_token(), body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let issues = response.body["message"].as_array().expect("issues");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["type"], "min_value");
    assert_eq!(issues[0]["path"][0]["key"], "minutesDuration");
    assert_eq!(issues[0]["expected"], ">=30");
}

#[tokio::test]
async fn invalid_barber_id_and_email_are_reported() {
    let app = TestApp::new();
    let mut body = appointment("barber-1");
    body["clientEmail"] = json!("nobody");

    let response = app.post("/appointment", &admin_token(), body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let messages: Vec<&str> = response.body["message"]
        .as_array()
        .expect("issues")
        .iter()
        .filter_map(|issue| issue["message"].as_str())
        .collect();
    assert_eq!(messages, vec!["Invalid barber ID", "Invalid email"]);
}

#[tokio::test]
async fn appointments_are_listed_per_barber() {
    let app = TestApp::new();
    let token = admin_token();
    let other = "1b4e28ba-2fa1-41d2-883f-0016d3cca427";

    app.post("/appointment", &token, appointment(BARBER_ID)).await;
    app.post("/appointment", &token, appointment(BARBER_ID)).await;
    app.post("/appointment", &token, appointment(other)).await;

    let nested = app
        .get(&format!("/barber/{BARBER_ID}/appointment"), &token)
        .await;
    assert_eq!(nested.status, StatusCode::OK);
    let records = nested.body.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record["barberId"] == BARBER_ID));

    let none = app.get("/barber/unknown/appointment", &token).await;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.body, json!([]));
}

#[tokio::test]
async fn patch_then_delete_appointment() {
    let app = TestApp::new();
    let token = admin_token();

    let created = app.post("/appointment", &token, appointment(BARBER_ID)).await;
    let id = created.body["appointment"]["id"].as_str().unwrap().to_string();

    let patched = app
        .patch(
            &format!("/appointment/{id}"),
            &token,
            json!({ "name": "Beard trim", "minutesDuration": 15 }),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(
        patched.body,
        json!({ "id": id, "name": "Beard trim", "minutesDuration": 15 })
    );

    let deleted = app.delete(&format!("/appointment/{id}"), &token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "message": "Appointment deleted" }));

    let missing = app.get(&format!("/appointment/{id}"), &token).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body, json!({ "message": "Appointment not found" }));
}

#[tokio::test]
async fn patch_skips_creation_rules() {
    let app = TestApp::new();
    let token = admin_token();

    let created = app.post("/appointment", &token, appointment(BARBER_ID)).await;
    let id = created.body["appointment"]["id"].as_str().unwrap().to_string();

    let patched = app
        .patch(
            &format!("/appointment/{id}"),
            &token,
            json!({ "start": "2025-03-02 10:00", "barberId": "barber-1" }),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(
        patched.body,
        json!({ "id": id, "start": "2025-03-02 10:00", "barberId": "barber-1" })
    );
}

#[tokio::test]
async fn delete_unknown_appointment_is_not_found() {
    let app = TestApp::new();
    let response = app.delete("/appointment/not-a-uuid", &admin_token()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "message": "Appointment not found" }));
}
