//! Backend access for submitting and loading records.

mod error;
mod http;

pub use error::SubmitError;
pub use http::HttpRecordClient;

use serde::{Deserialize, Serialize};

use crate::form::Record;

/// Server acknowledgement of a submitted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Something that accepts a finished record.
#[allow(async_fn_in_trait)]
pub trait Submitter {
    async fn submit(&self, record: &Record) -> Result<Receipt, SubmitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_status_optional() {
        let receipt: Receipt = serde_json::from_str(r#"{"id":"PQR-0042"}"#).unwrap();
        assert_eq!(receipt.id, "PQR-0042");
        assert!(receipt.status.is_none());

        let receipt: Receipt =
            serde_json::from_str(r#"{"id":"PQR-0043","status":"pending-review"}"#).unwrap();
        assert_eq!(receipt.status.as_deref(), Some("pending-review"));
    }
}
