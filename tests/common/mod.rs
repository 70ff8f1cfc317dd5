#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use zeroize::Zeroizing;

use coursedesk::config::Config;
use coursedesk::error::Result;
use coursedesk::gateway::{PaymentGateway, RemoteOrderRequest, RemoteOrderStatus};
use coursedesk::models::catalog::INITIAL_ATTEMPTS;
use coursedesk::models::user::{Entitlement, User};
use coursedesk::repositories::memory::InMemoryUserStore;
use coursedesk::repositories::user::UserStore;
use coursedesk::services::orders::CreateOrderInput;
use coursedesk::state::AppState;

pub static TEST_CONFIG: Lazy<Config> = Lazy::new(|| Config {
    database_url: "postgres://unused".to_string(),
    session_secret: Zeroizing::new(vec![0x42; 32]),
    gateway_base_url: "http://gateway.invalid".to_string(),
    gateway_client_id: "test-client".to_string(),
    gateway_client_secret: "test-secret".to_string(),
    gateway_currency: "INR".to_string(),
});

/// A gateway whose order status is scripted by the test.
pub struct ScriptedGateway {
    status: Mutex<RemoteOrderStatus>,
    pub created: Mutex<Vec<RemoteOrderRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(RemoteOrderStatus::Other("ACTIVE".to_string())),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, status: RemoteOrderStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn mark_paid(&self) {
        self.set_status(RemoteOrderStatus::Paid);
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_order(&self, request: &RemoteOrderRequest) -> Result<serde_json::Value> {
        self.created.lock().unwrap().push(request.clone());
        Ok(serde_json::json!({
            "order_id": request.order_id,
            "order_amount": request.amount,
            "order_currency": request.currency,
            "order_status": "ACTIVE",
            "payment_session_id": "session_test",
        }))
    }

    async fn order_status(&self, _order_id: &str) -> Result<RemoteOrderStatus> {
        Ok(self.status.lock().unwrap().clone())
    }
}

pub struct TestBackend {
    pub state: AppState,
    pub store: Arc<InMemoryUserStore>,
    pub gateway: Arc<ScriptedGateway>,
}

pub fn test_backend() -> TestBackend {
    let store = Arc::new(InMemoryUserStore::new());
    let gateway = Arc::new(ScriptedGateway::new());
    let state = AppState::with_backends(store.clone(), gateway.clone(), TEST_CONFIG.clone());
    TestBackend {
        state,
        store,
        gateway,
    }
}

pub fn order_input(mobile: &str, course_id: &str) -> CreateOrderInput {
    CreateOrderInput {
        name: "Asha Verma".to_string(),
        mobile: mobile.to_string(),
        email: "asha@example.com".to_string(),
        course_id: course_id.to_string(),
        amount: 499.0,
        return_url: "https://shop.example.com/return?order={order_id}".to_string(),
        center: Some("Pune".to_string()),
    }
}

/// Seeds a user holding one paid entitlement, bypassing the order flow.
pub async fn seed_paid_user(
    store: &InMemoryUserStore,
    mobile: &str,
    course_id: &str,
    attempts_left: i32,
) -> User {
    let mut user = User::new(
        "Asha Verma".to_string(),
        mobile.to_string(),
        "asha@example.com".to_string(),
        None,
    );
    user.courses.push(paid_entitlement(course_id, "order_seeded"));
    user.courses[0].attempts_left = attempts_left;
    store.save(&user).await.unwrap();
    user
}

pub fn paid_entitlement(course_id: &str, order_id: &str) -> Entitlement {
    Entitlement {
        course_id: course_id.to_string(),
        course_name: course_id.to_string(),
        subject: "CSS".to_string(),
        paid: true,
        order_id: order_id.to_string(),
        paid_at: Some(Utc::now()),
        expires_at: Utc::now() + Duration::days(20),
        attempts_left: INITIAL_ATTEMPTS,
        completed_modules: Vec::new(),
    }
}

/// Pulls the order id out of a relayed gateway payload.
pub fn order_id_of(payload: &serde_json::Value) -> String {
    payload
        .get("order_id")
        .and_then(|v| v.as_str())
        .expect("gateway payload carries order_id")
        .to_string()
}
