//! End-to-end tests for the metering REST API
//!
//! Every test starts its own server on the in-memory backend with a flat
//! tariff of 2.0 rupees per unit.

use anyhow::Result;
use integration_tests::*;
use reqwest::{header, StatusCode};

/// Create a customer through the admin API and log it in
async fn create_customer(server: &TestServer, admin_token: &str) -> Result<(UserResponse, String)> {
    let request = CreateCustomerRequest::unique();
    let response = server
        .post_auth("/users/customer", admin_token, &request)
        .await?;
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await?;
    let token = server.login(&request.email, &request.password).await?;
    Ok((user, token))
}

async fn top_up(server: &TestServer, admin_token: &str, user_id: i64, amount: f64) -> Result<UserResponse> {
    let response = server
        .post_auth(
            &format!("/users/customer/topup/{user_id}"),
            admin_token,
            &TopUpRequest { amount },
        )
        .await?;
    assert_json(response, StatusCode::OK).await
}

async fn submit_reading(server: &TestServer, token: &str, watts: f64) -> Result<UserResponse> {
    let response = server
        .post_auth("/customers/increase", token, &ReadingRequest::watts(watts))
        .await?;
    assert_json(response, StatusCode::OK).await
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/health").await?;
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await?;
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health/ready").await?;
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["storage"], "healthy");

    Ok(())
}

// ============================================================================
// Token issuance
// ============================================================================

#[tokio::test]
async fn test_token_issuance() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.request_token(ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    let token: TokenResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(token.token_type, "bearer");
    assert!(!token.access_token.is_empty());

    let response = server.get_auth("/users/all", &token.access_token).await?;
    assert_status(response, StatusCode::OK).await?;

    Ok(())
}

#[tokio::test]
async fn test_token_rejects_bad_credentials() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.request_token(ADMIN_EMAIL, "wrong-password").await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(code, "INVALID_CREDENTIALS");

    let response = server
        .request_token("nobody@example.com", ADMIN_PASSWORD)
        .await?;
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(code, "INVALID_CREDENTIALS");

    Ok(())
}

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
async fn test_missing_or_invalid_token_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/users/all").await?;
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(code, "UNAUTHORIZED");

    let response = server.get_auth("/customers/me", "not-a-token").await?;
    assert_status(response, StatusCode::UNAUTHORIZED).await?;

    Ok(())
}

#[tokio::test]
async fn test_roles_are_enforced() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (_, customer) = create_customer(&server, &admin).await?;

    // Customers cannot reach admin routes
    let response = server.get_auth("/users/all", &customer).await?;
    let code = assert_error(response, StatusCode::FORBIDDEN).await?;
    assert_eq!(code, "FORBIDDEN");

    // Administrators have no meter
    let response = server.get_auth("/customers/bill", &admin).await?;
    assert_status(response, StatusCode::FORBIDDEN).await?;

    Ok(())
}

// ============================================================================
// User management
// ============================================================================

#[tokio::test]
async fn test_admin_creates_customer() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let request = CreateCustomerRequest::unique();
    let response = server.post_auth("/users/customer", &admin, &request).await?;
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await?;

    assert_eq!(user.email, request.email);
    assert!(!user.is_admin);
    let customer = user.customer.expect("customer record");
    assert_eq!(customer.nic_number, request.customer.nic_number);
    assert_eq!(customer.account_balance_in_rupees, 0.0);
    assert_eq!(customer.watts_consumed, 0.0);
    assert!(!customer.should_get_service);

    let response = server.get_auth(&format!("/users/{}", user.id), &admin).await?;
    let fetched: UserResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(fetched.id, user.id);

    Ok(())
}

#[tokio::test]
async fn test_admin_creates_admin() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let request = CreateAdminRequest::unique();
    let response = server.post_auth("/users/admin", &admin, &request).await?;
    let user: UserResponse = assert_json(response, StatusCode::CREATED).await?;
    assert!(user.is_admin);
    assert!(user.customer.is_none());

    // The new administrator can log in and manage users
    let token = server.login(&request.email, &request.password).await?;
    let response = server.get_auth("/users/all/admins", &token).await?;
    let admins: Vec<UserResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(admins.len(), 2);
    assert!(admins.iter().all(|u| u.is_admin));

    Ok(())
}

#[tokio::test]
async fn test_list_filters() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    create_customer(&server, &admin).await?;
    create_customer(&server, &admin).await?;

    let response = server.get_auth("/users/all", &admin).await?;
    let all: Vec<UserResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(all.len(), 3);

    let response = server.get_auth("/users/all/customers", &admin).await?;
    let customers: Vec<UserResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(customers.len(), 2);
    assert!(customers.iter().all(|u| u.customer.is_some()));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_and_nic_conflict() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let first = CreateCustomerRequest::unique();
    let response = server.post_auth("/users/customer", &admin, &first).await?;
    assert_status(response, StatusCode::CREATED).await?;

    let mut same_email = CreateCustomerRequest::unique();
    same_email.email = first.email.clone();
    let response = server.post_auth("/users/customer", &admin, &same_email).await?;
    assert_status(response, StatusCode::CONFLICT).await?;

    let mut same_nic = CreateCustomerRequest::unique();
    same_nic.customer.nic_number = first.customer.nic_number.clone();
    let response = server.post_auth("/users/customer", &admin, &same_nic).await?;
    assert_status(response, StatusCode::CONFLICT).await?;

    let response = server.get_auth("/users/all/customers", &admin).await?;
    let customers: Vec<UserResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(customers.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_create_customer_validation() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let mut request = CreateCustomerRequest::unique();
    request.customer.nic_number = "12345".to_string();
    let response = server.post_auth("/users/customer", &admin, &request).await?;
    let code = assert_error(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(code, "VALIDATION_ERROR");

    let mut request = CreateCustomerRequest::unique();
    request.email = "not-an-email".to_string();
    let response = server.post_auth("/users/customer", &admin, &request).await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    Ok(())
}

#[tokio::test]
async fn test_update_customer_profile() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, _) = create_customer(&server, &admin).await?;

    let update = UpdateCustomerRequest {
        name: "Renamed".to_string(),
        email: unique_email("renamed"),
        customer: CustomerFields {
            nic_number: unique_nic_number(),
        },
    };
    let response = server
        .put_auth(&format!("/users/{}/customer", user.id), &admin, &update)
        .await?;
    let updated: UserResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.email, update.email);
    assert_eq!(
        updated.customer.map(|c| c.nic_number),
        Some(update.customer.nic_number)
    );

    Ok(())
}

#[tokio::test]
async fn test_update_admin_profile() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let response = server.get_auth("/users/all/admins", &admin).await?;
    let admins: Vec<UserResponse> = assert_json(response, StatusCode::OK).await?;
    let id = admins[0].id;

    let update = UpdateAdminRequest {
        name: "Head Operator".to_string(),
        email: ADMIN_EMAIL.to_string(),
    };
    let response = server
        .put_auth(&format!("/users/{id}/admin"), &admin, &update)
        .await?;
    let updated: UserResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.name, "Head Operator");
    assert!(updated.is_admin);

    Ok(())
}

#[tokio::test]
async fn test_delete_user_cascades() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, customer_token) = create_customer(&server, &admin).await?;

    let response = server
        .delete_auth(&format!("/users/{}", user.id), &admin)
        .await?;
    let deleted: DeletedResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(deleted.detail, "Deleted successfully");

    let response = server.get_auth(&format!("/users/{}", user.id), &admin).await?;
    assert_status(response, StatusCode::NOT_FOUND).await?;

    // The token outlives its subject but no longer authenticates
    let response = server.get_auth("/customers/me", &customer_token).await?;
    assert_status(response, StatusCode::UNAUTHORIZED).await?;

    let response = server
        .delete_auth(&format!("/users/{}", user.id), &admin)
        .await?;
    assert_status(response, StatusCode::NOT_FOUND).await?;

    Ok(())
}

#[tokio::test]
async fn test_invalid_user_id_path() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let response = server.get_auth("/users/abc", &admin).await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    let response = server.get_auth("/users/999999", &admin).await?;
    assert_status(response, StatusCode::NOT_FOUND).await?;

    Ok(())
}

// ============================================================================
// Metering
// ============================================================================

#[tokio::test]
async fn test_top_up_enables_service() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, token) = create_customer(&server, &admin).await?;

    let updated = top_up(&server, &admin, user.id, 50.0).await?;
    let customer = updated.customer.expect("customer record");
    assert_eq!(customer.account_balance_in_rupees, 50.0);
    assert!(customer.should_get_service);

    let response = server.get_auth("/customers/should-get-service", &token).await?;
    let eligible: bool = assert_json(response, StatusCode::OK).await?;
    assert!(eligible);

    Ok(())
}

#[tokio::test]
async fn test_top_up_rejects_negative_and_unknown() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, _) = create_customer(&server, &admin).await?;

    let response = server
        .post_auth(
            &format!("/users/customer/topup/{}", user.id),
            &admin,
            &TopUpRequest { amount: -5.0 },
        )
        .await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    let response = server
        .post_auth(
            "/users/customer/topup/999999",
            &admin,
            &TopUpRequest { amount: 5.0 },
        )
        .await?;
    assert_status(response, StatusCode::NOT_FOUND).await?;

    Ok(())
}

#[tokio::test]
async fn test_readings_drain_balance_and_cut_service() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, token) = create_customer(&server, &admin).await?;
    top_up(&server, &admin, user.id, 20.0).await?;

    // 5 units at 2.0
    let after = submit_reading(&server, &token, 5_000.0).await?;
    let customer = after.customer.expect("customer record");
    assert_eq!(customer.watts_consumed, 5_000.0);
    assert_eq!(customer.account_balance_in_rupees, 10.0);
    assert_eq!(customer.previous_voltage_reading, 230.0);
    assert_eq!(customer.previous_current_reading, 5.0);
    assert!(customer.should_get_service);

    // Balance lands exactly on zero
    let after = submit_reading(&server, &token, 5_000.0).await?;
    let customer = after.customer.expect("customer record");
    assert_eq!(customer.account_balance_in_rupees, 0.0);
    assert!(!customer.should_get_service);

    let response = server.get_auth("/customers/should-get-service", &token).await?;
    let eligible: bool = assert_json(response, StatusCode::OK).await?;
    assert!(!eligible);

    Ok(())
}

#[tokio::test]
async fn test_service_stays_off_until_balance_positive() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, token) = create_customer(&server, &admin).await?;

    // 10 units at 2.0 from an empty balance
    submit_reading(&server, &token, 10_000.0).await?;

    let updated = top_up(&server, &admin, user.id, 15.0).await?;
    let customer = updated.customer.expect("customer record");
    assert_eq!(customer.account_balance_in_rupees, -5.0);
    assert!(!customer.should_get_service);

    let updated = top_up(&server, &admin, user.id, 10.0).await?;
    let customer = updated.customer.expect("customer record");
    assert_eq!(customer.account_balance_in_rupees, 5.0);
    assert!(customer.should_get_service);

    Ok(())
}

#[tokio::test]
async fn test_reading_validation() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (_, token) = create_customer(&server, &admin).await?;

    let zero_voltage = ReadingRequest {
        watts_consumed: 100.0,
        voltage: 0.0,
        current: 5.0,
    };
    let response = server
        .post_auth("/customers/increase", &token, &zero_voltage)
        .await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    let negative_watts = ReadingRequest {
        watts_consumed: -1.0,
        voltage: 230.0,
        current: 5.0,
    };
    let response = server
        .post_auth("/customers/increase", &token, &negative_watts)
        .await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    // Nothing was recorded
    let response = server.get_auth("/customers/me", &token).await?;
    let me: UserResponse = assert_json(response, StatusCode::OK).await?;
    let customer = me.customer.expect("customer record");
    assert_eq!(customer.watts_consumed, 0.0);
    assert_eq!(customer.previous_voltage_reading, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_bill_statement() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (user, token) = create_customer(&server, &admin).await?;
    top_up(&server, &admin, user.id, 100.0).await?;
    submit_reading(&server, &token, 5_000.0).await?;

    let response = server.get_auth("/customers/bill", &token).await?;
    let bill: BillResponse = assert_json(response, StatusCode::OK).await?;
    assert_eq!(
        bill.message,
        "You have used 5.0 units, please pay 10.0 rupees to continue using our service."
    );

    Ok(())
}

#[tokio::test]
async fn test_concurrent_readings_are_all_applied() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (_, token) = create_customer(&server, &admin).await?;

    let requests = (0..10).map(|_| submit_reading(&server, &token, 1_000.0));
    for result in futures::future::join_all(requests).await {
        result?;
    }

    let response = server.get_auth("/customers/me", &token).await?;
    let me: UserResponse = assert_json(response, StatusCode::OK).await?;
    let customer = me.customer.expect("customer record");
    assert_eq!(customer.watts_consumed, 10_000.0);
    assert_eq!(customer.account_balance_in_rupees, -20.0);

    Ok(())
}
