//! Integration tests for the REST client and the remote data source,
//! against a fake marketplace backend.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

use marketplace_admin::api::{
    ApiError, LoginCredentials, MarketplaceClient, MerchantFilters, MerchantUpdate,
};
use marketplace_admin::config::MarketplaceApiConfig;
use marketplace_admin::mock;
use marketplace_core::{KycStatus, MerchantStatus, OrderStatus};
use marketplace_integration_tests::{
    app_for, body_json, get as get_request, login, remote_config, send, spawn_backend,
};

const TOKEN: &str = "backend-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {TOKEN}")[..])
}

/// Backend that requires the bearer token everywhere except login.
fn backend() -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "wrong" {
                    return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
                }
                Json(json!({
                    "token": TOKEN,
                    "user": { "name": "Ops", "email": body["email"], "role": "admin" }
                }))
                .into_response()
            }),
        )
        .route(
            "/api/merchants",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(mock::merchants().unwrap()).into_response()
            }),
        )
        .route(
            "/api/merchants/{id}",
            get(|Path(id): Path<String>| async move {
                (StatusCode::NOT_FOUND, format!("no merchant {id}"))
            }),
        )
        .route(
            "/api/orders/{id}/status",
            patch(
                |headers: HeaderMap, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    if !authorized(&headers) {
                        return StatusCode::UNAUTHORIZED.into_response();
                    }
                    let mut order = mock::orders()
                        .unwrap()
                        .into_iter()
                        .find(|o| o.id.as_str() == id)
                        .unwrap();
                    order.status = serde_json::from_value(body["status"].clone()).unwrap();
                    Json(order).into_response()
                },
            ),
        )
        .route(
            "/api/orders",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") }),
        )
        .route("/api/forbidden", get(|| async { StatusCode::FORBIDDEN }))
}

/// One request seen by the recording backend.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    method: Method,
    path: String,
    query: Option<String>,
    bearer: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Seen>>>;

/// Answer any request with demo data and record what was asked.
async fn record(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    log.lock().unwrap().push(Seen {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        bearer: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let path = uri.path();
    if method == Method::GET {
        match path {
            "/api/merchants" | "/api/merchants/search" => {
                return Json(mock::merchants().unwrap()).into_response();
            }
            "/api/customers/search" => return Json(mock::customers().unwrap()).into_response(),
            "/api/orders/search" => return Json(mock::orders().unwrap()).into_response(),
            "/api/auth/me" => {
                return Json(json!({ "name": "Ops", "email": "ops@nearu.com", "role": "admin" }))
                    .into_response();
            }
            _ => {}
        }
    }
    if method == Method::PUT && path == "/api/merchants/M002" {
        let mut merchant = mock::merchants().unwrap().swap_remove(1);
        merchant.status = MerchantStatus::Suspended;
        return Json(merchant).into_response();
    }
    if method == Method::POST && path == "/api/auth/logout" {
        return StatusCode::NO_CONTENT.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

async fn recording_backend() -> (String, Log) {
    let log = Log::default();
    let router = Router::new().fallback(record).with_state(log.clone());
    (spawn_backend(router).await, log)
}

fn last_seen(log: &Log) -> Seen {
    log.lock().unwrap().last().cloned().unwrap()
}

fn client(base_url: &str, token: Option<&str>) -> MarketplaceClient {
    MarketplaceClient::new(
        &MarketplaceApiConfig {
            base_url: Url::parse(base_url).unwrap(),
            timeout: Duration::from_secs(5),
            token: token.map(SecretString::from),
        },
        true,
    )
    .unwrap()
}

#[tokio::test]
async fn test_login_stores_token_for_later_requests() {
    let api = client(&spawn_backend(backend()).await, None);
    assert!(matches!(api.merchants().await, Err(ApiError::SessionExpired)));

    let user = api
        .login(&LoginCredentials {
            email: "ops@nearu.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.email, "ops@nearu.com");
    assert!(api.has_token().await);

    let merchants = api.merchants().await.unwrap();
    assert_eq!(merchants.len(), 12);
}

#[tokio::test]
async fn test_rejected_login_keeps_no_token() {
    let api = client(&spawn_backend(backend()).await, None);
    let result = api
        .login(&LoginCredentials {
            email: "ops@nearu.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::SessionExpired)));
    assert!(!api.has_token().await);
}

#[tokio::test]
async fn test_unauthorized_response_clears_token() {
    let api = client(&spawn_backend(backend()).await, Some("stale-token"));
    assert!(api.has_token().await);
    assert!(matches!(api.merchants().await, Err(ApiError::SessionExpired)));
    assert!(!api.has_token().await);
}

#[tokio::test]
async fn test_status_errors_carry_body() {
    let api = client(&spawn_backend(backend()).await, Some(TOKEN));

    let err = api.merchant("M404").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        ApiError::Status { status: 404, ref message } if message == "no merchant M404"
    ));

    let err = api.orders().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert!(api.has_token().await);
}

#[tokio::test]
async fn test_order_status_update_round_trips() {
    let api = client(&spawn_backend(backend()).await, Some(TOKEN));
    let order = api
        .update_order_status("ORD-1004", OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_search_endpoints_send_query_and_token() {
    let (base, log) = recording_backend().await;
    let api = client(&base, Some(TOKEN));
    let bearer = Some(format!("Bearer {TOKEN}"));

    assert_eq!(api.search_merchants("spice & co").await.unwrap().len(), 12);
    let seen = last_seen(&log);
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/api/merchants/search");
    assert_eq!(seen.query.as_deref(), Some("q=spice+%26+co"));
    assert_eq!(seen.bearer, bearer);

    assert_eq!(api.search_customers("alice").await.unwrap().len(), 12);
    let seen = last_seen(&log);
    assert_eq!(seen.path, "/api/customers/search");
    assert_eq!(seen.query.as_deref(), Some("q=alice"));
    assert_eq!(seen.bearer, bearer);

    assert_eq!(api.search_orders("ORD-10").await.unwrap().len(), 15);
    let seen = last_seen(&log);
    assert_eq!(seen.path, "/api/orders/search");
    assert_eq!(seen.query.as_deref(), Some("q=ORD-10"));
    assert_eq!(seen.bearer, bearer);
}

#[tokio::test]
async fn test_filter_merchants_sends_only_set_filters() {
    let (base, log) = recording_backend().await;
    let api = client(&base, Some(TOKEN));

    api.filter_merchants(&MerchantFilters {
        status: Some(MerchantStatus::Active),
        category: Some("Fast Food".to_string()),
        kyc_status: Some(KycStatus::Approved),
    })
    .await
    .unwrap();
    let seen = last_seen(&log);
    assert_eq!(seen.path, "/api/merchants");
    assert_eq!(
        seen.query.as_deref(),
        Some("status=active&category=Fast+Food&kycStatus=approved")
    );

    api.filter_merchants(&MerchantFilters::default()).await.unwrap();
    assert_eq!(last_seen(&log).query, None);
}

#[tokio::test]
async fn test_update_merchant_puts_changed_fields() {
    let (base, log) = recording_backend().await;
    let api = client(&base, Some(TOKEN));

    let merchant = api
        .update_merchant(
            "M002",
            &MerchantUpdate {
                status: Some(MerchantStatus::Suspended),
                business_name: Some("Brew Corner".to_string()),
                ..MerchantUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(merchant.status, MerchantStatus::Suspended);

    let seen = last_seen(&log);
    assert_eq!(seen.method, Method::PUT);
    assert_eq!(seen.path, "/api/merchants/M002");
    assert_eq!(seen.bearer, Some(format!("Bearer {TOKEN}")));
    let body: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        body,
        json!({ "businessName": "Brew Corner", "status": "suspended" })
    );
}

#[tokio::test]
async fn test_current_user_and_logout() {
    let (base, log) = recording_backend().await;
    let api = client(&base, Some(TOKEN));

    let user = api.current_user().await.unwrap();
    assert_eq!(user.email, "ops@nearu.com");
    assert_eq!(last_seen(&log).path, "/api/auth/me");

    api.logout().await.unwrap();
    let seen = last_seen(&log);
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/api/auth/logout");
    assert_eq!(seen.bearer, Some(format!("Bearer {TOKEN}")));
    assert!(!api.has_token().await);
}

#[tokio::test]
async fn test_failed_logout_keeps_token() {
    let api = client(&spawn_backend(backend()).await, Some(TOKEN));
    assert!(api.logout().await.is_err());
    assert!(api.has_token().await);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_request_error() {
    let api = client("http://127.0.0.1:9/api", None);
    assert!(matches!(api.merchants().await, Err(ApiError::Request(_))));
}

#[tokio::test]
async fn test_remote_tables_serve_cached_rows_on_failure() {
    let base = spawn_backend(backend()).await;
    let app = app_for(remote_config(&base));
    let cookie = login(&app).await;

    let response = send(&app, get_request("/api/orders", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 0);

    let response = send(&app, get_request("/api/notices", Some(&cookie))).await;
    let notices = body_json(response).await;
    assert_eq!(notices[0]["kind"], "error");
    assert_eq!(notices[0]["message"], "Failed to load orders");
}

#[tokio::test]
async fn test_remote_lookup_maps_not_found() {
    let base = spawn_backend(backend()).await;
    let app = app_for(remote_config(&base));
    let cookie = login(&app).await;

    let response = send(&app, get_request("/api/merchants/M404", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_backend_rejection_signs_the_admin_out() {
    let base = spawn_backend(backend()).await;
    let app = app_for(remote_config(&base));
    let cookie = login(&app).await;

    let response: Response = send(&app, get_request("/api/merchants", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = send(&app, get_request("/api/auth/me", Some(&cookie))).await;
    assert_eq!(body_json(response).await, json!({ "state": "unauthenticated" }));

    let response = send(&app, get_request("/api/merchants", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
