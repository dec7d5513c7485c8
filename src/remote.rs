use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed remote attempt. Always recoverable: the record stays in the
/// local backlog and a later sync pass retries it. No status-code
/// branching is needed beyond success/failure.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected transaction: HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub user_id: String,
    pub amount: i64,
    pub vendor: String,
    pub raw_text: String,
    pub transaction_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub amount: i64,
    pub vendor: String,
    pub category: Option<String>,
}

/// The single RPC the core needs. A trait so the repository can be tested
/// against scripted successes and failures.
pub trait RemoteClient: Send + Sync {
    fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<TransactionResponse, SyncError>;
}

pub struct HttpRemoteClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRemoteClient {
    pub fn new(base_url: &str) -> std::result::Result<Self, SyncError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RemoteClient for HttpRemoteClient {
    fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<TransactionResponse, SyncError> {
        let url = format!("{}/transactions", self.base_url);
        let response = self.client.post(&url).json(request).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpRemoteClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_request_serializes_to_server_shape() {
        let req = TransactionRequest {
            user_id: "default_user".to_string(),
            amount: 15000,
            vendor: "스타벅스강남점".to_string(),
            raw_text: "신한카드 15,000원 승인 스타벅스강남점".to_string(),
            transaction_date: "2026-02-15T13:00:00".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["user_id"], "default_user");
        assert_eq!(json["amount"], 15000);
        assert_eq!(json["transaction_date"], "2026-02-15T13:00:00");
    }

    #[test]
    fn test_response_deserializes_with_nullable_category() {
        let resp: TransactionResponse =
            serde_json::from_str(r#"{"id": 7, "amount": 15000, "vendor": "스타벅스강남점", "category": null}"#)
                .unwrap();
        assert_eq!(resp.id, 7);
        assert_eq!(resp.category, None);

        let resp: TransactionResponse =
            serde_json::from_str(r#"{"id": 8, "amount": 4500, "vendor": "CU편의점", "category": "편의점"}"#)
                .unwrap();
        assert_eq!(resp.category.as_deref(), Some("편의점"));
    }
}
