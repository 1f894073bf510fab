//! HTTP-level tests: the full route table (rate limiting, auth middleware,
//! extractor) over a MemoryStore-backed app.

use std::sync::Arc;

use actix_web::{App, test, web::Data};
use chrono::NaiveDate;
use serde_json::json;

use crate::auth::jwt::generate_access_token;
use crate::config::Config;
use crate::ledger::LeaveLedger;
use crate::model::role::Role;
use crate::model::user::{LeaveBalances, NewUser};
use crate::routes;
use crate::store::{MemoryStore, Store};

const SECRET: &str = "test-secret";

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: SECRET.into(),
        server_addr: String::new(),
        access_token_ttl: 3600,
        rate_login_per_min: 60,
        rate_signup_per_min: 30,
        rate_protected_per_min: 1000,
        api_prefix: "/api".into(),
        admin_name: None,
        admin_email: None,
        admin_password: None,
    }
}

async fn seed_user(store: &MemoryStore, email: &str, role: Role, balances: LeaveBalances) -> String {
    let id = store
        .insert_user(
            NewUser {
                name: format!("user {email}"),
                email: email.into(),
                department: "Engineering".into(),
                joining_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                password: "not-a-real-hash".into(),
                role_id: role.id(),
            },
            balances,
        )
        .await
        .unwrap();
    generate_access_token(id, email.into(), role.id(), SECRET, 3600).unwrap()
}

macro_rules! app {
    ($store:expr) => {{
        let config = test_config();
        let routes_config = config.clone();
        test::init_service(
            App::new()
                .app_data(Data::from($store.clone() as Arc<dyn Store>))
                .app_data(Data::new(LeaveLedger::new($store.clone() as Arc<dyn Store>)))
                .app_data(Data::new(config))
                .configure(move |cfg| routes::configure(cfg, routes_config.clone())),
        )
        .await
    }};
}

fn get(uri: &str, token: Option<&str>) -> test::TestRequest {
    let mut req = test::TestRequest::get()
        .uri(uri)
        .peer_addr("127.0.0.1:9999".parse().unwrap());
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    req
}

#[actix_web::test]
async fn protected_routes_require_a_valid_token() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let resp = test::call_service(&app, get("/api/leave-requests/mine", None).to_request()).await;
    assert_eq!(resp.status(), 401);

    let resp = test::call_service(&app, get("/api/leave-requests/mine", Some("garbage")).to_request()).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn employee_patch_is_forbidden_regardless_of_ownership() {
    let store = Arc::new(MemoryStore::new());
    let employee_token = seed_user(
        &store,
        "emp@company.com",
        Role::Employee,
        LeaveBalances::default_grant(),
    )
    .await;
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave-requests")
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {employee_token}")))
        .set_json(json!({
            "leaveType": "ANNUAL",
            "startDate": "2024-03-01",
            "endDate": "2024-03-03",
            "reason": "family trip"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let id = body["leaveRequest"]["id"].as_u64().unwrap();

    // Deciding one's own request with an employee token is still 403.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/leave-requests/{id}"))
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {employee_token}")))
        .set_json(json!({ "decision": "APPROVED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn leave_lifecycle_over_http() {
    let store = Arc::new(MemoryStore::new());
    let employee_token = seed_user(
        &store,
        "emp@company.com",
        Role::Employee,
        LeaveBalances {
            annual: 10,
            sick: 5,
            casual: 2,
        },
    )
    .await;
    let admin_token = seed_user(
        &store,
        "admin@company.com",
        Role::Admin,
        LeaveBalances::default(),
    )
    .await;
    let app = app!(store);

    // Submit a 3-day request; any client-supplied "days" is ignored.
    let req = test::TestRequest::post()
        .uri("/api/leave-requests")
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {employee_token}")))
        .set_json(json!({
            "leaveType": "ANNUAL",
            "startDate": "2024-03-01",
            "endDate": "2024-03-03",
            "reason": "family trip",
            "days": 999
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let id = body["leaveRequest"]["id"].as_u64().unwrap();
    assert_eq!(body["leaveRequest"]["days"], 3);
    assert_eq!(body["leaveRequest"]["status"], "PENDING");

    // Balance untouched while pending.
    let body: serde_json::Value =
        test::call_and_read_body_json(&app, get("/api/leave-balance", Some(&employee_token)).to_request()).await;
    assert_eq!(body["annual"], 10);

    // Approve deducts exactly once.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/leave-requests/{id}"))
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .set_json(json!({ "decision": "APPROVED", "decisionNote": "enjoy" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value =
        test::call_and_read_body_json(&app, get("/api/leave-balance", Some(&employee_token)).to_request()).await;
    assert_eq!(body["annual"], 7);

    // A second decision conflicts and the balance stays at 7.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/leave-requests/{id}"))
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .set_json(json!({ "decision": "APPROVED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let body: serde_json::Value =
        test::call_and_read_body_json(&app, get("/api/leave-balance", Some(&employee_token)).to_request()).await;
    assert_eq!(body["annual"], 7);
}

#[actix_web::test]
async fn admin_listing_and_directory_are_role_gated() {
    let store = Arc::new(MemoryStore::new());
    let employee_token = seed_user(
        &store,
        "emp@company.com",
        Role::Employee,
        LeaveBalances::default_grant(),
    )
    .await;
    let admin_token = seed_user(
        &store,
        "admin@company.com",
        Role::Admin,
        LeaveBalances::default(),
    )
    .await;
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave-requests")
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {employee_token}")))
        .set_json(json!({
            "leaveType": "SICK",
            "startDate": "2024-03-01",
            "endDate": "2024-03-01",
            "reason": "flu"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    // Employee cannot use the admin listing or the directory.
    let resp = test::call_service(&app, get("/api/leave-requests", Some(&employee_token)).to_request()).await;
    assert_eq!(resp.status(), 403);
    let resp = test::call_service(&app, get("/api/employees", Some(&employee_token)).to_request()).await;
    assert_eq!(resp.status(), 403);

    // Admin sees the request with its owner's name, and the directory.
    let body: serde_json::Value = test::call_and_read_body_json(
        &app,
        get("/api/leave-requests?status=PENDING", Some(&admin_token)).to_request(),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["userName"], "user emp@company.com");

    let body: serde_json::Value =
        test::call_and_read_body_json(&app, get("/api/employees", Some(&admin_token)).to_request()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn owner_can_cancel_a_pending_request_over_http() {
    let store = Arc::new(MemoryStore::new());
    let employee_token = seed_user(
        &store,
        "emp@company.com",
        Role::Employee,
        LeaveBalances::default_grant(),
    )
    .await;
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave-requests")
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {employee_token}")))
        .set_json(json!({
            "leaveType": "CASUAL",
            "startDate": "2024-03-01",
            "endDate": "2024-03-01",
            "reason": "tentative"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let id = body["leaveRequest"]["id"].as_u64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/leave-requests/{id}"))
        .peer_addr("127.0.0.1:9999".parse().unwrap())
        .insert_header(("Authorization", format!("Bearer {employee_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let resp = test::call_service(
        &app,
        get(&format!("/api/leave-requests/{id}"), Some(&employee_token)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}
