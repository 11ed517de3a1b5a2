use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::transaction::{CreateTransactionData, Transaction};
use crate::services::{qr, rotation};

/// A UPI deep-link payment intent: scanning the QR opens the payer's UPI app
/// with recipient, amount, currency and reference prefilled.
#[derive(Debug, Clone)]
pub struct UpiIntent<'a> {
    pub address: &'a str,
    pub payee_name: &'a str,
    pub amount: Decimal,
    pub reference: &'a str,
    pub note: Option<&'a str>,
}

impl UpiIntent<'_> {
    pub fn to_uri(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("pa", self.address);
        query.append_pair("pn", self.payee_name);
        query.append_pair("am", &self.amount.to_string());
        query.append_pair("cu", "INR");
        query.append_pair("tr", self.reference);
        if let Some(note) = self.note {
            query.append_pair("tn", note);
        }

        format!("upi://pay?{}", query.finish())
    }
}

/// Time-based prefix plus random suffix. Collisions are treated as
/// negligible; the UNIQUE constraint on `txn_id` is the actual guarantee.
pub fn new_txn_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("TXN{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Creates a new payment request: validates the amount, assigns an address
/// from the rotation pool, renders the QR image and persists the pending
/// transaction. Nothing is persisted if rendering fails.
pub async fn create_request(
    pool: &PgPool,
    config: &Config,
    amount: Decimal,
    description: Option<String>,
) -> Result<Transaction> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let address = rotation::select_for_assignment(pool).await?;
    let txn_id = new_txn_id();

    let intent = UpiIntent {
        address: &address.upi_id,
        payee_name: &config.merchant_name,
        amount,
        reference: &txn_id,
        note: description.as_deref(),
    };
    let qr_code = qr::render_data_url(&intent.to_uri())?;

    let transaction = Transaction::create(
        pool,
        CreateTransactionData {
            txn_id,
            amount,
            description,
            upi_id: address.upi_id.clone(),
            qr_code,
        },
    )
    .await?;

    rotation::record_usage(pool, &address.upi_id).await?;

    tracing::info!(
        txn_id = %transaction.txn_id,
        upi_id = %transaction.upi_id,
        amount = %transaction.amount,
        "Created payment request"
    );

    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_intent_uri_with_note() {
        let intent = UpiIntent {
            address: "merchant@paytm",
            payee_name: "Demo Merchant",
            amount: dec("100.00"),
            reference: "TXN1700000000000abc123",
            note: Some("Coffee & cake"),
        };

        let uri = intent.to_uri();
        assert!(uri.starts_with("upi://pay?"));
        assert!(uri.contains("pa=merchant%40paytm"));
        assert!(uri.contains("am=100.00"));
        assert!(uri.contains("cu=INR"));
        assert!(uri.contains("tr=TXN1700000000000abc123"));
        assert!(uri.contains("tn=Coffee+%26+cake"));
    }

    #[test]
    fn test_intent_uri_without_note() {
        let intent = UpiIntent {
            address: "demo@ybl",
            payee_name: "Demo Merchant",
            amount: dec("49.50"),
            reference: "TXN1xyz",
            note: None,
        };

        assert!(!intent.to_uri().contains("tn="));
    }

    #[test]
    fn test_txn_id_shape() {
        let id = new_txn_id();

        assert!(id.starts_with("TXN"));
        let rest = &id[3..];
        assert!(rest.len() > 6);
        let (millis, suffix) = rest.split_at(rest.len() - 6);
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_txn_ids_differ() {
        assert_ne!(new_txn_id(), new_txn_id());
    }
}
