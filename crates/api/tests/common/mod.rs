//! Shared harness for API integration tests: the full router over a test
//! database, with in-memory fakes for the billing provider and the mailer.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use brnno_api::auth::jwt::{generate_access_token, JwtConfig};
use brnno_api::config::ServerConfig;
use brnno_api::router::build_app_router;
use brnno_api::state::AppState;
use brnno_billing::{
    BillingError, BillingEvent, BillingProvider, CheckoutParams, CreatedCheckout,
};
use brnno_core::pricing::{PriceSlot, PriceTable};
use brnno_email::{EmailError, Mailer, OutgoingEmail};

pub const CRON_SECRET: &str = "test-cron-secret";
pub const APP_URL: &str = "https://app.brnno.test";
pub const GOOD_SIGNATURE: &str = "t=1,v1=good";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Records every checkout request; returns a queued event for webhooks
/// signed with [`GOOD_SIGNATURE`].
#[derive(Default)]
pub struct FakeBilling {
    pub customers: Mutex<Vec<String>>,
    pub checkouts: Mutex<Vec<CheckoutParams>>,
    pub next_event: Mutex<Option<BillingEvent>>,
    pub fail_provider: Mutex<bool>,
}

impl FakeBilling {
    pub fn queue_event(&self, event: BillingEvent) {
        *self.next_event.lock().unwrap() = Some(event);
    }
}

#[async_trait]
impl BillingProvider for FakeBilling {
    async fn find_or_create_customer(&self, email: &str) -> Result<String, BillingError> {
        if *self.fail_provider.lock().unwrap() {
            return Err(BillingError::Provider("card network unavailable".into()));
        }
        self.customers.lock().unwrap().push(email.to_string());
        Ok(format!("cus_{}", email.len()))
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutParams,
    ) -> Result<CreatedCheckout, BillingError> {
        let mut checkouts = self.checkouts.lock().unwrap();
        checkouts.push(params);
        let id = format!("cs_test_{}", checkouts.len());
        Ok(CreatedCheckout {
            url: format!("https://checkout.stripe.test/{id}"),
            session_id: id,
        })
    }

    fn verify_webhook(&self, _payload: &str, signature: &str) -> Result<BillingEvent, BillingError> {
        if signature != GOOD_SIGNATURE {
            return Err(BillingError::WebhookSignature("no matching signature".into()));
        }
        Ok(self
            .next_event
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| BillingEvent::Other("invoice.paid".into())))
    }
}

/// Collects sent emails; sends to addresses in `failing` return an error.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub failing: Mutex<HashSet<String>>,
}

impl FakeMailer {
    pub fn fail_for(&self, address: &str) {
        self.failing.lock().unwrap().insert(address.to_string());
    }

    pub fn sent_to(&self, address: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.to == address)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.failing.lock().unwrap().contains(&email.to) {
            return Err(EmailError::HttpStatus {
                status: 422,
                body: "rejected".into(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        audience: None,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_app_url: APP_URL.to_string(),
        cron_secret: Some(CRON_SECRET.to_string()),
        jwt: test_jwt(),
    }
}

/// Every slot priced as `price_<slot key>`.
pub fn full_price_table() -> PriceTable {
    let mut table = PriceTable::new();
    for slot in PriceSlot::all() {
        table.insert(slot, format!("price_{}", slot.key()));
    }
    table
}

pub struct TestApp {
    pub app: Router,
    pub pool: PgPool,
    pub billing: Arc<FakeBilling>,
    pub mailer: Arc<FakeMailer>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

/// Build the full application router, with the production middleware
/// stack, over the given pool.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, test_config(), full_price_table())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig, prices: PriceTable) -> TestApp {
    let billing = Arc::new(FakeBilling::default());
    let mailer = Arc::new(FakeMailer::default());

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        prices: Arc::new(prices),
        billing: billing.clone(),
        mailer: mailer.clone(),
    };

    TestApp {
        app: build_app_router(state, &config),
        pool,
        billing,
        mailer,
    }
}

pub fn token_for(user_id: Uuid) -> String {
    generate_access_token(user_id, 15, &test_jwt()).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_bearer(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
