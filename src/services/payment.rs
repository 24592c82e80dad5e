//! Payment gateway adapter and session tracking.
//!
//! The core never talks to the network while holding a seat lock: a payment
//! session is created from an already-persisted pending booking, and the
//! asynchronous result comes back later through the webhook.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{error, info};

use crate::config::PaymentConfig;
use crate::error::BookingError;
use crate::models::{Booking, BookingId};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gateway rejected payment session: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSessionRequest {
    pub amount_cents: i64,
    pub order_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub session_id: String,
    pub payment_url: String,
}

/// Capability interface for creating payment sessions. The gateway invokes
/// the webhook exactly once per session with the final result.
pub trait PaymentGateway: Send + Sync {
    fn create_payment_session(
        &self,
        request: PaymentSessionRequest,
    ) -> BoxFuture<'_, Result<PaymentSession, GatewayError>>;
}

#[derive(Debug, Serialize)]
struct GatewayInitRequest {
    #[serde(rename = "merchantId")]
    merchant_id: String,
    token: String,
    amount: i64,
    currency: String,
    #[serde(rename = "orderId")]
    order_id: String,
    description: String,
    #[serde(rename = "successURL")]
    success_url: String,
    #[serde(rename = "failURL")]
    fail_url: String,
    #[serde(rename = "webhookURL")]
    webhook_url: String,
}

#[derive(Debug, Deserialize)]
struct GatewayInitResponse {
    success: bool,
    #[serde(rename = "paymentId")]
    payment_id: Option<String>,
    #[serde(rename = "paymentURL")]
    payment_url: Option<String>,
    message: Option<String>,
}

/// HTTP client for a token-signed JSON payment gateway.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    merchant_id: String,
    password: String,
    base_url: String,
    success_url: String,
    fail_url: String,
    webhook_url: String,
    http_client: reqwest::Client,
}

impl HttpPaymentGateway {
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self {
            merchant_id: config.merchant_id.clone(),
            password: config.merchant_password.clone(),
            base_url: config.gateway_url.clone(),
            success_url: config.success_url.clone(),
            fail_url: config.fail_url.clone(),
            webhook_url: config.webhook_url.clone(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Request signature over the amount, order and merchant secret.
    fn sign(&self, amount: i64, currency: &str, order_id: &str) -> String {
        let token_string = format!(
            "{}{}{}{}{}",
            amount, currency, order_id, self.password, self.merchant_id
        );
        let mut hasher = Sha256::new();
        hasher.update(token_string.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl PaymentGateway for HttpPaymentGateway {
    fn create_payment_session(
        &self,
        request: PaymentSessionRequest,
    ) -> BoxFuture<'_, Result<PaymentSession, GatewayError>> {
        Box::pin(async move {
            let body = GatewayInitRequest {
                merchant_id: self.merchant_id.clone(),
                token: self.sign(request.amount_cents, "USD", &request.order_id),
                amount: request.amount_cents,
                currency: "USD".to_string(),
                order_id: request.order_id.clone(),
                description: request.description,
                success_url: self.success_url.clone(),
                fail_url: self.fail_url.clone(),
                webhook_url: self.webhook_url.clone(),
            };

            let response = self
                .http_client
                .post(format!("{}/payments/init", self.base_url))
                .json(&body)
                .send()
                .await?
                .error_for_status()?;

            let parsed: GatewayInitResponse = response.json().await?;
            if !parsed.success {
                return Err(GatewayError::Rejected(
                    parsed.message.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
            match (parsed.payment_id, parsed.payment_url) {
                (Some(session_id), Some(payment_url)) => {
                    info!(order_id = %body.order_id, session_id = %session_id, "payment session created");
                    Ok(PaymentSession {
                        session_id,
                        payment_url,
                    })
                }
                _ => Err(GatewayError::Rejected(
                    "gateway response missing payment id or url".to_string(),
                )),
            }
        })
    }
}

/// Outcome reported by the gateway webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Success,
    Failure,
}

/// Tracks which gateway session belongs to which booking. Sessions are
/// consumed exactly once when their result arrives; sessions whose result
/// never arrives are pruned once their booking settles.
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    sessions: RwLock<HashMap<String, BookingId>>,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a payment session for a pending booking. Gateway failure
    /// leaves the booking pending; the caller may retry or let the sweeper
    /// reclaim it.
    pub async fn initiate(
        &self,
        booking: &Booking,
        description: String,
    ) -> Result<PaymentSession, BookingError> {
        let request = PaymentSessionRequest {
            amount_cents: booking.total_amount_cents,
            order_id: format!("booking-{}-{}", booking.id, booking.created_at.timestamp()),
            description,
        };
        let session = self
            .gateway
            .create_payment_session(request)
            .await
            .map_err(|e| {
                error!(booking_id = booking.id, "payment session creation failed: {e}");
                BookingError::Gateway(e.to_string())
            })?;
        self.sessions
            .write()
            .unwrap()
            .insert(session.session_id.clone(), booking.id);
        Ok(session)
    }

    /// Consumes a session, returning its booking. A second webhook for the
    /// same session finds nothing.
    pub fn take_session(&self, session_id: &str) -> Option<BookingId> {
        self.sessions.write().unwrap().remove(session_id)
    }

    /// Drops sessions whose booking has settled, so sessions abandoned by
    /// the gateway don't accumulate. Invoked from the sweep pass.
    pub fn prune_settled(&self, settled: impl Fn(BookingId) -> bool) {
        self.sessions
            .write()
            .unwrap()
            .retain(|_, booking_id| !settled(*booking_id));
    }
}
