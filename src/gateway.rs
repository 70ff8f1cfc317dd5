use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use crate::{
    config::Config,
    error::{AppError, Result},
};

/// The customer details sent with a remote order.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteCustomer {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

/// One remote order creation request.
#[derive(Debug, Clone)]
pub struct RemoteOrderRequest {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub customer: RemoteCustomer,
    pub return_url: String,
}

/// The gateway's view of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOrderStatus {
    Paid,
    Other(String),
}

impl RemoteOrderStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, RemoteOrderStatus::Paid)
    }

    pub fn label(&self) -> &str {
        match self {
            RemoteOrderStatus::Paid => "PAID",
            RemoteOrderStatus::Other(s) => s,
        }
    }
}

/// The two operations the core consumes from the payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a remote order and returns the provider's payload verbatim.
    async fn create_order(&self, request: &RemoteOrderRequest) -> Result<serde_json::Value>;

    /// Queries the provider for one order's status.
    async fn order_status(&self, order_id: &str) -> Result<RemoteOrderStatus>;
}

/// The production gateway client speaking the provider's order API over HTTP.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpGateway {
    /// Creates a gateway client from the application configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            client_id: config.gateway_client_id.clone(),
            client_secret: config.gateway_client_secret.clone(),
        }
    }

    fn gateway_error(detail: impl ToString) -> AppError {
        AppError::Gateway(serde_json::Value::String(detail.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn create_order(&self, request: &RemoteOrderRequest) -> Result<serde_json::Value> {
        let body = serde_json::json!({
            "order_id": request.order_id,
            "order_amount": request.amount,
            "order_currency": request.currency,
            "customer_details": request.customer,
            "order_meta": {
                "return_url": request.return_url,
            },
        });

        tracing::debug!("Creating remote order {}", request.order_id);

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .header("x-client-id", &self.client_id)
            .header("x-client-secret", &self.client_secret)
            .json(&body)
            .send()
            .await
            .map_err(Self::gateway_error)?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await.map_err(Self::gateway_error)?;

        if !status.is_success() {
            tracing::error!(
                "Remote order {} rejected with {}: {}",
                request.order_id,
                status,
                payload
            );
            return Err(AppError::Gateway(payload));
        }

        tracing::info!("Remote order {} created", request.order_id);
        Ok(payload)
    }

    async fn order_status(&self, order_id: &str) -> Result<RemoteOrderStatus> {
        let response = self
            .client
            .get(format!("{}/orders/{}", self.base_url, order_id))
            .header("x-client-id", &self.client_id)
            .header("x-client-secret", &self.client_secret)
            .send()
            .await
            .map_err(Self::gateway_error)?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await.map_err(Self::gateway_error)?;

        if !status.is_success() {
            tracing::error!("Order status query {} failed with {}: {}", order_id, status, payload);
            return Err(AppError::Gateway(payload));
        }

        let order_status = payload
            .get("order_status")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN");

        if order_status == "PAID" {
            Ok(RemoteOrderStatus::Paid)
        } else {
            Ok(RemoteOrderStatus::Other(order_status.to_string()))
        }
    }
}
