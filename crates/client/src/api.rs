use async_trait::async_trait;
use serde_json::Value;

use crmdesk_catalog::{Customer, CustomerQuery, ReferenceRecord};
use crmdesk_core::RemoteId;
use crmdesk_sales::SalePayload;

use crate::error::ApiError;
use crate::normalize::raw_items;
use crate::token::AuthToken;

/// Server answer to a document submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub body: Value,
}

impl SubmissionReceipt {
    /// Ids of the created documents, in any list envelope or a single object.
    pub fn document_ids(&self) -> Vec<RemoteId> {
        let id_of = |v: &Value| v.get("id").and_then(Value::as_i64).map(RemoteId::new);
        let items = raw_items(self.body.clone());
        if items.is_empty() {
            return id_of(&self.body).into_iter().collect();
        }
        items.iter().filter_map(id_of).collect()
    }
}

/// Operations the order form needs from the remote CRM.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// One reference list; failures are reported.
    async fn try_list_reference_data<R: ReferenceRecord>(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<R>, ApiError>;

    /// One reference list; any failure yields an empty list.
    async fn list_reference_data<R: ReferenceRecord>(&self, token: &AuthToken) -> Vec<R> {
        match self.try_list_reference_data::<R>(token).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(kind = %R::KIND, error = %err, "reference list unavailable");
                Vec::new()
            }
        }
    }

    async fn search_customers(
        &self,
        query: &CustomerQuery,
        token: &AuthToken,
    ) -> Result<Vec<Customer>, ApiError>;

    async fn submit_order(
        &self,
        payload: &SalePayload,
        token: &AuthToken,
    ) -> Result<SubmissionReceipt, ApiError>;

    /// Whether the server accepts the token.
    async fn validate_token(&self, token: &AuthToken) -> bool;
}
