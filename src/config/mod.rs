use std::env;

use serde::Deserialize;

// Top-level configuration container, one section per concern.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub reservation: ReservationConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

// Timing knobs for the reservation lifecycle. Hold TTL is seconds-scale,
// the unpaid-booking timeout minutes-scale; both drive the sweeper.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationConfig {
    pub hold_ttl_seconds: i64,
    pub payment_timeout_seconds: i64,
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub merchant_id: String,
    pub merchant_password: String,
    pub gateway_url: String,
    pub success_url: String,
    pub fail_url: String,
    pub webhook_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "movie_booking=debug,tower_http=debug".to_string()),
            },
            reservation: ReservationConfig {
                hold_ttl_seconds: env::var("SEAT_HOLD_TTL_SECONDS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()
                    .expect("SEAT_HOLD_TTL_SECONDS must be a valid number"),
                payment_timeout_seconds: env::var("BOOKING_PAYMENT_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .expect("BOOKING_PAYMENT_TIMEOUT_SECONDS must be a valid number"),
                sweep_interval_seconds: env::var("SWEEP_INTERVAL_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("SWEEP_INTERVAL_SECONDS must be a valid number"),
            },
            payment: PaymentConfig {
                merchant_id: env::var("MERCHANT_ID").unwrap_or_else(|_| "demo-merchant".to_string()),
                merchant_password: env::var("MERCHANT_PASSWORD")
                    .unwrap_or_else(|_| "demo-password".to_string()),
                gateway_url: env::var("PAYMENT_GATEWAY_URL")
                    .unwrap_or_else(|_| "https://gateway.example.com/api/v1".to_string()),
                success_url: env::var("PAYMENT_SUCCESS_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/payment/success".to_string()),
                fail_url: env::var("PAYMENT_FAIL_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/payment/fail".to_string()),
                webhook_url: env::var("PAYMENT_WEBHOOK_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api/payments/webhook".to_string()),
            },
        }
    }

    /// Configuration invariant: the unpaid-booking timeout must be at least
    /// as long as the hold TTL, or holds could expire before payment
    /// completes.
    pub fn validate(&self) -> anyhow::Result<()> {
        let r = &self.reservation;
        if r.hold_ttl_seconds <= 0 {
            anyhow::bail!("SEAT_HOLD_TTL_SECONDS must be positive");
        }
        if r.payment_timeout_seconds <= 0 {
            anyhow::bail!("BOOKING_PAYMENT_TIMEOUT_SECONDS must be positive");
        }
        if r.sweep_interval_seconds == 0 {
            anyhow::bail!("SWEEP_INTERVAL_SECONDS must be positive");
        }
        if r.payment_timeout_seconds < r.hold_ttl_seconds {
            anyhow::bail!(
                "BOOKING_PAYMENT_TIMEOUT_SECONDS ({}) must be >= SEAT_HOLD_TTL_SECONDS ({})",
                r.payment_timeout_seconds,
                r.hold_ttl_seconds
            );
        }
        Ok(())
    }
}
