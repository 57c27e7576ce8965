#![allow(dead_code)]

// tests/common/mod.rs
use std::time::{Duration, SystemTime};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use gateway::auth::jwt::{mint_access_token, DEFAULT_TOKEN_TTL};
use gateway::state::builder::build_state;
use gateway::{build_app, GatewayConfig, SecurityConfig, ServiceUrls};

pub const TEST_SECRET: &str = "gateway_test_secret_for_integration_tests";

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    gateway_test_support::logging::init();
}

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes())
}

/// Every backend pointed at the same base URL.
pub fn all_services(url: &str) -> ServiceUrls {
    ServiceUrls {
        auth: url.to_string(),
        blog: url.to_string(),
        comment: url.to_string(),
        profile: url.to_string(),
    }
}

pub fn test_config(services: ServiceUrls) -> GatewayConfig {
    let mut config = GatewayConfig::new(test_security());
    config.services = services;
    config.upstream_timeout = Duration::from_secs(5);
    config
}

/// `Authorization` value carrying a valid token for `subject`.
pub fn bearer_for(subject: &str) -> String {
    let token = mint_access_token(subject, SystemTime::now(), DEFAULT_TOKEN_TTL, &test_security())
        .expect("mint test token");
    format!("Bearer {token}")
}

/// `Authorization` value carrying a token that expired an hour ago.
pub fn expired_bearer_for(subject: &str) -> String {
    let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
    let token = mint_access_token(subject, issued, Duration::from_secs(60 * 60), &test_security())
        .expect("mint expired token");
    format!("Bearer {token}")
}

/// `Authorization` value carrying a token signed with a different secret.
pub fn foreign_bearer_for(subject: &str) -> String {
    let token = mint_access_token(
        subject,
        SystemTime::now(),
        DEFAULT_TOKEN_TTL,
        &SecurityConfig::new("some-other-secret".as_bytes()),
    )
    .expect("mint foreign token");
    format!("Bearer {token}")
}

/// Gateway app with the full production middleware stack.
pub async fn init_gateway(
    config: GatewayConfig,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let state = build_state()
        .with_config(config)
        .build()
        .expect("gateway state should build");

    test::init_service(build_app(web::Data::new(state))).await
}
