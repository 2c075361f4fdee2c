//! End-to-end API integration tests
//!
//! These tests drive the full router over in-memory repositories and verify:
//! - Authentication and password reset flows
//! - Role enforcement before validation or persistence
//! - Budget creation, audited updates and soft deletion
//! - Member provisioning with temporary passwords
//! - Dashboard aggregates

mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{setup, PASSWORD};
use zeus_api::domain::repositories::{BudgetRepository, UserRepository};
use zeus_api::domain::user::{Email, Role};

fn budget_body(responsible_id: Uuid) -> Value {
    json!({
        "projectDescription": "Institutional website",
        "clientName": "Padaria Central",
        "responsibleId": responsible_id.to_string(),
        "estimatedValue": 1000,
        "expectedCosts": "300.00"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK" }));
}

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let app = setup();
    let admin = app.admin().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADMIN@compjunior.com.br", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mustChangePassword"], json!(false));
    assert_eq!(body["user"]["id"], json!(admin.id.to_string()));
    assert_eq!(body["user"]["role"], json!("admin"));

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], json!("admin@compjunior.com.br"));
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email_alike() {
    let app = setup();
    app.admin().await;

    let (wrong_status, wrong_body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@compjunior.com.br", "password": "nope" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ghost@compjunior.com.br", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"], unknown_body["error"]);
}

#[tokio::test]
async fn test_login_requires_fields() {
    let app = setup();

    let (status, body) = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup();

    let (status, _) = app.send(Method::GET, "/api/budgets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/api/budgets", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_cannot_create_budget_and_store_is_untouched() {
    let app = setup();
    let member = app.member().await;
    let token = app.token_for(&member);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(member.id)),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("admin"));
    assert_eq!(app.budgets.stored_count().await, 0);
}

#[tokio::test]
async fn test_denial_precedes_validation() {
    let app = setup();
    let member = app.member().await;
    let token = app.token_for(&member);

    // Invalid body: a member must still get 403, not 400
    let (status, _) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(json!({ "estimatedValue": -1 })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_denial_precedes_type_errors_in_body() {
    let app = setup();
    let admin = app.admin().await;
    let member = app.member().await;
    let token = app.token_for(&member);

    let (_, created) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&app.token_for(&admin)),
            Some(budget_body(admin.id)),
        )
        .await;
    let uri = format!("/api/budgets/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(json!({ "clientName": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (status, _) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "estimatedValue": [1], "status": false })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/members",
            Some(&token),
            Some(json!({ "fullName": "Carla Dias", "role": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.budgets.stored_count().await, 1);
    let stored: Uuid = created["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(app.budgets.find_by_id(stored).await.unwrap().unwrap().version(), 0);
}

#[tokio::test]
async fn test_type_errors_are_listed_with_other_violations() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(json!({
                "projectDescription": "App",
                "clientName": 5,
                "responsibleId": admin.id.to_string(),
                "estimatedValue": -5,
                "expectedCosts": 10,
                "status": "bogus"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["clientName", "estimatedValue", "status"]);
    assert_eq!(errors[0]["message"], json!("clientName must be a string"));
    assert_eq!(app.budgets.stored_count().await, 0);
}

#[tokio::test]
async fn test_create_budget_reports_every_violation() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(json!({
                "projectDescription": "App",
                "clientName": "",
                "responsibleId": admin.id.to_string(),
                "estimatedValue": -1,
                "expectedCosts": 10,
                "status": "bogus"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["clientName", "estimatedValue", "status"]);
    assert_eq!(app.budgets.stored_count().await, 0);
}

#[tokio::test]
async fn test_create_budget_with_unknown_responsible() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(Uuid::new_v4())),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("reference_not_found"));
}

#[tokio::test]
async fn test_create_budget() {
    let app = setup();
    let admin = app.admin().await;
    let member = app.member().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(member.id)),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["budgetNumber"].as_str().unwrap().starts_with("ORC"));
    assert_eq!(body["status"], json!("under_review"));
    assert_eq!(body["estimatedValue"], json!("1000.00"));
    assert_eq!(body["expectedCosts"], json!("300.00"));
    assert_eq!(body["createdBy"], json!(admin.id.to_string()));
    assert_eq!(body["responsible"]["fullName"], json!("Member User"));
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn test_update_records_history_in_field_order() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (_, created) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(admin.id)),
        )
        .await;
    let uri = format!("/api/budgets/{}", created["id"].as_str().unwrap());

    let (status, updated) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "approved", "estimatedValue": 1500 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let history = updated["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["field"], json!("estimatedValue"));
    assert_eq!(history[0]["oldValue"], json!("1000.00"));
    assert_eq!(history[0]["newValue"], json!("1500.00"));
    assert_eq!(history[1]["field"], json!("status"));
    assert_eq!(history[1]["oldValue"], json!("under_review"));
    assert_eq!(history[1]["newValue"], json!("approved"));
    assert_eq!(history[0]["changedAt"], history[1]["changedAt"]);

    // A second update appends without touching earlier records
    let (_, again) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "clientName": "Padaria Nova" })),
        )
        .await;
    let history_again = again["history"].as_array().unwrap();
    assert_eq!(history_again.len(), 3);
    assert_eq!(&history_again[..2], &history[..]);
    assert_eq!(history_again[2]["field"], json!("clientName"));
}

#[tokio::test]
async fn test_estimated_value_change_is_audited_after_creation() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (_, created) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(admin.id)),
        )
        .await;
    assert_eq!(created["estimatedValue"], json!("1000.00"));
    let uri = format!("/api/budgets/{}", created["id"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, updated) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "estimatedValue": 1200.50 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["estimatedValue"], json!("1200.50"));

    let history = updated["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["field"], json!("estimatedValue"));
    assert_eq!(history[0]["oldValue"], json!("1000.00"));
    assert_eq!(history[0]["newValue"], json!("1200.50"));

    let created_at: DateTime<Utc> = updated["createdAt"].as_str().unwrap().parse().unwrap();
    let changed_at: DateTime<Utc> = history[0]["changedAt"].as_str().unwrap().parse().unwrap();
    assert!(changed_at > created_at);
}

#[tokio::test]
async fn test_equal_values_do_not_write() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (_, created) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(admin.id)),
        )
        .await;
    let uri = format!("/api/budgets/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({
                "estimatedValue": "1000.00",
                "expectedCosts": 300,
                "clientName": "Padaria Central"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"], json!([]));
    assert_eq!(body["version"], created["version"]);
    assert_eq!(body["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn test_protected_fields_are_ignored() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (_, created) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(admin.id)),
        )
        .await;
    let uri = format!("/api/budgets/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({
                "createdBy": Uuid::new_v4().to_string(),
                "budgetNumber": "ORC2000010001",
                "history": [{ "field": "forged" }],
                "id": Uuid::new_v4().to_string()
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["createdBy"], created["createdBy"]);
    assert_eq!(body["budgetNumber"], created["budgetNumber"]);
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn test_update_missing_budget_is_not_found() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/budgets/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "status": "approved" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}

#[tokio::test]
async fn test_update_missing_budget_wins_over_unknown_responsible() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/budgets/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "responsibleId": Uuid::new_v4().to_string() })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}

#[tokio::test]
async fn test_malformed_id_returns_json_error() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    for (method, uri) in [
        (Method::GET, "/api/budgets/not-a-uuid"),
        (Method::DELETE, "/api/budgets/not-a-uuid"),
        (Method::GET, "/api/members/42"),
    ] {
        let (status, body) = app.send(method, uri, Some(&token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid path"));
    }

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/budgets/not-a-uuid",
            Some(&token),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_soft_delete_hides_budget() {
    let app = setup();
    let admin = app.admin().await;
    let token = app.token_for(&admin);

    let (_, created) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&token),
            Some(budget_body(admin.id)),
        )
        .await;
    let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();
    let uri = format!("/api/budgets/{}", id);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.send(Method::GET, "/api/budgets", Some(&token), None).await;
    assert_eq!(list, json!([]));

    assert!(app.budgets.is_deleted(id).await);
    assert!(app.budgets.find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_budgets_filters() {
    let app = setup();
    let admin = app.admin().await;
    let member = app.member().await;
    let admin_token = app.token_for(&admin);
    let member_token = app.token_for(&member);

    app.send(
        Method::POST,
        "/api/budgets",
        Some(&admin_token),
        Some(budget_body(admin.id)),
    )
    .await;
    let (_, second) = app
        .send(
            Method::POST,
            "/api/budgets",
            Some(&admin_token),
            Some(budget_body(member.id)),
        )
        .await;
    app.send(
        Method::PUT,
        &format!("/api/budgets/{}", second["id"].as_str().unwrap()),
        Some(&admin_token),
        Some(json!({ "status": "approved" })),
    )
    .await;

    // Members may read
    let (status, all) = app
        .send(Method::GET, "/api/budgets", Some(&member_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, approved) = app
        .send(
            Method::GET,
            "/api/budgets?status=approved",
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(approved.as_array().unwrap().len(), 1);
    assert_eq!(approved[0]["id"], second["id"]);

    let (_, mine) = app
        .send(
            Method::GET,
            &format!("/api/budgets?responsibleId={}", member.id),
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["responsible"]["email"], json!("member@compjunior.com.br"));

    let (status, _) = app
        .send(
            Method::GET,
            "/api/budgets?status=pending",
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_provisioning_issues_temporary_password() {
    let app = setup();
    let member = app.member().await;
    let token = app.token_for(&member);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/members",
            Some(&token),
            Some(json!({
                "fullName": "Bruno Lima",
                "email": "bruno@compjunior.com.br",
                "dateOfBirth": "2001-08-20",
                "admissionDate": "2024-02-01",
                "skills": "rust, sql, rust"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], json!("member"));
    assert_eq!(body["gender"], json!("prefer_not_to_say"));
    assert_eq!(body["mustChangePassword"], json!(true));
    assert_eq!(body["skills"], json!(["rust", "sql"]));
    assert!(body.get("passwordHash").is_none());

    let temporary = body["temporaryPassword"].as_str().unwrap().to_string();
    assert_eq!(temporary.len(), 16);

    let stored = app
        .users
        .find_by_email(&Email::new("bruno@compjunior.com.br").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, temporary);

    let (status, login) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "bruno@compjunior.com.br", "password": temporary })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["mustChangePassword"], json!(true));
}

#[tokio::test]
async fn test_member_cannot_assign_admin_role() {
    let app = setup();
    let member = app.member().await;
    let token = app.token_for(&member);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/members",
            Some(&token),
            Some(json!({
                "fullName": "Carla Dias",
                "email": "carla@compjunior.com.br",
                "dateOfBirth": "1999-01-01",
                "admissionDate": "2023-01-01",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/members/{}", member.id),
            Some(&token),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stored = app.users.find_by_id(member.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Member);
}

#[tokio::test]
async fn test_admin_can_promote_member() {
    let app = setup();
    let admin = app.admin().await;
    let member = app.member().await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/members/{}", member.id),
            Some(&token),
            Some(json!({ "role": "admin", "phoneNumber": "+55 11 98888-7777" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], json!("admin"));
    assert_eq!(body["phoneNumber"], json!("+55 11 98888-7777"));
}

#[tokio::test]
async fn test_member_email_must_be_institutional_and_unique() {
    let app = setup();
    let member = app.member().await;
    let token = app.token_for(&member);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/members",
            Some(&token),
            Some(json!({
                "fullName": "Dan",
                "email": "dan@gmail.com",
                "dateOfBirth": "1999-01-01",
                "admissionDate": "2023-01-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("email"));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/members",
            Some(&token),
            Some(json!({
                "fullName": "Impostor",
                "email": "member@compjunior.com.br",
                "dateOfBirth": "1999-01-01",
                "admissionDate": "2023-01-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("constraint_violation"));
}

#[tokio::test]
async fn test_list_members_ordered_by_name() {
    let app = setup();
    let member = app.member().await;
    app.admin().await;
    let token = app.token_for(&member);

    let (status, body) = app.send(Method::GET, "/api/members", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Admin User", "Member User"]);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = setup();
    let member = app.member().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/forgot-password",
            None,
            Some(json!({ "email": "member@compjunior.com.br" })),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let reset_token = body["resetToken"].as_str().unwrap().to_string();

    // A reset token is not a bearer token
    let (status, _) = app
        .send(Method::GET, "/api/auth/me", Some(&reset_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": reset_token, "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], json!("password"));

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": reset_token, "password": "brand-new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, login) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "member@compjunior.com.br", "password": "brand-new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["id"], json!(member.id.to_string()));
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_unknown_email() {
    let app = setup();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/forgot-password",
            None,
            Some(json!({ "email": "nobody@compjunior.com.br" })),
        )
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.get("resetToken").is_none());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_dashboard_aggregates() {
    let app = setup();
    let admin = app.admin().await;
    let member = app.member().await;
    let token = app.token_for(&member);
    let admin_token = app.token_for(&admin);

    app.send(
        Method::POST,
        "/api/budgets",
        Some(&admin_token),
        Some(budget_body(admin.id)),
    )
    .await;
    app.send(
        Method::POST,
        "/api/budgets",
        Some(&admin_token),
        Some(json!({
            "projectDescription": "Mobile app",
            "clientName": "Oficina",
            "responsibleId": member.id.to_string(),
            "estimatedValue": "2500.50",
            "expectedCosts": 1000
        })),
    )
    .await;

    let (status, body) = app
        .send(
            Method::GET,
            "/api/dashboard/employee-management",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adminCount"], json!(1));

    let (status, body) = app
        .send(
            Method::GET,
            "/api/dashboard/project-management",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalEstimatedValue"], json!("3500.50"));
    assert_eq!(body["totalExpectedCosts"], json!("1300.00"));
}
