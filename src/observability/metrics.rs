//! Metrics collection.
//!
//! # Metrics
//! - `wallet_detection_attempts_total` (counter): detection checks by wallet
//! - `wallet_detection_total` (counter): detection outcomes by wallet
//! - `wallet_connect_total` (counter): connects by wallet, outcome
//! - `wallet_sign_total` (counter): signature requests by wallet, outcome
//! - `payment_submit_total` (counter): network submissions by outcome
//! - `payment_submit_duration_seconds` (histogram): build+sign+submit latency
//! - `donation_record_total` (counter): donation-record posts by outcome
//!
//! Recording goes through the `metrics` facade; without an installed
//! recorder every call is a no-op.

use metrics::{counter, histogram};
use std::time::Duration;

pub fn record_detection_attempt(wallet: &'static str) {
    counter!("wallet_detection_attempts_total", "wallet" => wallet).increment(1);
}

pub fn record_detection(wallet: &'static str, available: bool) {
    let outcome = if available { "available" } else { "missing" };
    counter!("wallet_detection_total", "wallet" => wallet, "outcome" => outcome).increment(1);
}

pub fn record_connect(wallet: &'static str, outcome: &'static str) {
    counter!("wallet_connect_total", "wallet" => wallet, "outcome" => outcome).increment(1);
}

pub fn record_sign(wallet: &'static str, outcome: &'static str) {
    counter!("wallet_sign_total", "wallet" => wallet, "outcome" => outcome).increment(1);
}

pub fn record_submit(outcome: &'static str, elapsed: Duration) {
    counter!("payment_submit_total", "outcome" => outcome).increment(1);
    histogram!("payment_submit_duration_seconds", "outcome" => outcome).record(elapsed.as_secs_f64());
}

pub fn record_donation(outcome: &'static str) {
    counter!("donation_record_total", "outcome" => outcome).increment(1);
}
