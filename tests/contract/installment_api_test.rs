// Contract tests for the installment and account endpoints
//
// The real route configuration and middleware run on top of in-memory
// repositories.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::str::FromStr;

use actix_web::{http::StatusCode, test, App};
use finsys::app::configure_api;
use finsys::config::SchedulerConfig;
use finsys::core::Currency;
use finsys::middleware::{json_config, ErrorHandler, RequestId};
use helpers::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! init_app {
    ($ctx:expr) => {{
        let services = $ctx.app_services(SchedulerConfig::default());
        test::init_service(
            App::new()
                .wrap(ErrorHandler)
                .wrap(RequestId)
                .app_data(json_config())
                .app_data(services.installments.clone())
                .app_data(services.accounts.clone())
                .configure(configure_api),
        )
        .await
    }};
}

/// POST /installments returns 201 with the commitment id and schedule counts
#[actix_web::test]
async fn test_create_installment_contract() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/installments")
        .set_json(TestDataFactory::tv_payload(user.id, account.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["postings_scheduled"], 12);
    assert_eq!(body["duplicates_skipped"], 0);
    assert_eq!(ctx.queue.jobs().len(), 12);
}

#[actix_web::test]
async fn test_create_installment_unknown_user_is_404() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/installments")
        .set_json(TestDataFactory::tv_payload(Uuid::new_v4(), account.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 404);
    assert_eq!(body["error"]["message"], "Not found: Invalid user");
}

/// Every violated rule is listed in `error.details`
#[actix_web::test]
async fn test_create_installment_validation_details() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let app = init_app!(ctx);

    let mut payload = TestDataFactory::tv_payload(user.id, account.id);
    payload["value"] = json!("0");
    payload["months"] = json!(0);
    payload["description"] = json!("");

    let req = test::TestRequest::post()
        .uri("/installments")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);

    let details: Vec<&str> = body["error"]["details"]
        .as_array()
        .expect("details must be an array")
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(
        details,
        vec![
            "Value must be greater than zero",
            "Months must be greater than zero",
            "Description is required",
        ]
    );
    assert_eq!(ctx.commitments.len(), 0);
}

#[actix_web::test]
async fn test_create_installment_rejects_unknown_category() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let app = init_app!(ctx);

    let mut payload = TestDataFactory::tv_payload(user.id, account.id);
    payload["category"] = json!("gambling");

    let req = test::TestRequest::post()
        .uri("/installments")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid request body"));
}

#[actix_web::test]
async fn test_preview_contract() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/installments/preview")
        .set_json(TestDataFactory::tv_payload(user.id, account.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["installment_id"].is_null());

    let postings = body["postings"].as_array().unwrap();
    assert_eq!(postings.len(), 12);
    assert_eq!(postings[0]["sequence"], 1);
    assert_eq!(postings[0]["description"], "(1/12)-Total:1200-TV");
    assert!(postings[0].get("status").is_none());

    let total: Decimal = postings
        .iter()
        .map(|p| Decimal::from_str(p["value"].as_str().unwrap()).unwrap())
        .sum();
    assert_eq!(total, Decimal::from(1200));
    assert!(ctx.queue.jobs().is_empty());
}

#[actix_web::test]
async fn test_get_installment_and_schedule_contract() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let created = ctx
        .installment_service()
        .create(TestDataFactory::tv_command(user.id, account.id))
        .await
        .unwrap();
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/installments/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], created.id.to_string());
    assert_eq!(body["months"], 12);
    assert_eq!(body["end_month"], 12);
    assert_eq!(body["type"], "debit");
    assert_eq!(body["category"], "shopping");
    assert_eq!(body["currency"], "BRL");

    let req = test::TestRequest::get()
        .uri(&format!("/installments/{}/schedule", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["installment_id"], created.id.to_string());
    let postings = body["postings"].as_array().unwrap();
    assert_eq!(postings.len(), 12);
    assert!(postings.iter().all(|p| p["status"] == "pending"));
    assert!(postings.iter().all(|p| p["attempts"] == 0));
}

#[actix_web::test]
async fn test_get_unknown_installment_is_404() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/installments/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_reschedule_contract() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::BRL);
    let created = ctx
        .installment_service()
        .create(TestDataFactory::tv_command(user.id, account.id))
        .await
        .unwrap();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri(&format!("/installments/{}/reschedule", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["scheduled"], 0);
    assert_eq!(body["duplicates"], 12);
}

#[actix_web::test]
async fn test_get_account_contract() {
    let ctx = TestContext::new();
    let user = ctx.seed_user("Ana");
    let account = ctx.seed_account(&user, Currency::USD);
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/{}", account.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], account.id.to_string());
    assert_eq!(body["user_id"], user.id.to_string());
    assert_eq!(body["user_name"], "Ana");
    assert_eq!(body["currency"], "USD");
    assert!(body["moviments"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/accounts/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
