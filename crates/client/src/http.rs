//! `reqwest` implementation of [`CrmApi`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crmdesk_catalog::{Customer, CustomerQuery, ReferenceKind, ReferenceRecord};
use crmdesk_sales::SalePayload;

use crate::api::{CrmApi, SubmissionReceipt};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::normalize::Listing;
use crate::token::AuthToken;

const CUSTOMERS_ENDPOINT: &str = "contragents";
const SALES_ENDPOINT: &str = "docs_sales";

/// HTTP client for the CRM API. The token travels as the `token` query
/// parameter on every request.
#[derive(Debug, Clone)]
pub struct HttpCrmClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpCrmClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        token: &AuthToken,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(endpoint, "GET");
        let resp = self
            .http
            .get(self.config.endpoint_url(endpoint))
            .query(params)
            .query(&[("token", token.expose())])
            .send()
            .await?;
        Ok(resp)
    }

    async fn get_listing<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        token: &AuthToken,
    ) -> Result<Vec<T>, ApiError> {
        let resp = self.get(endpoint, params, token).await?;
        let value = read_json(endpoint, resp).await?;
        let listing = Listing::<T>::from_value(value)?;
        tracing::debug!(endpoint, shape = ?listing.shape, count = listing.items.len(), "listing");
        Ok(listing.into_items())
    }
}

async fn read_json(endpoint: &str, resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status = status.as_u16(), "request rejected");
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl CrmApi for HttpCrmClient {
    async fn try_list_reference_data<R: ReferenceRecord>(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<R>, ApiError> {
        let records: Vec<R> = self.get_listing(R::KIND.endpoint(), &[], token).await?;
        tracing::info!(kind = %R::KIND, count = records.len(), "reference list loaded");
        Ok(records)
    }

    async fn search_customers(
        &self,
        query: &CustomerQuery,
        token: &AuthToken,
    ) -> Result<Vec<Customer>, ApiError> {
        let customers: Vec<Customer> = self
            .get_listing(CUSTOMERS_ENDPOINT, &query.params(), token)
            .await?;
        tracing::debug!(count = customers.len(), "customer search");
        Ok(customers)
    }

    async fn submit_order(
        &self,
        payload: &SalePayload,
        token: &AuthToken,
    ) -> Result<SubmissionReceipt, ApiError> {
        tracing::info!(
            lines = payload.goods.len(),
            total = %payload.total(),
            conduct = payload.status,
            "submitting sales document"
        );
        let resp = self
            .http
            .post(self.config.endpoint_url(SALES_ENDPOINT))
            .query(&[("token", token.expose())])
            .json(payload)
            .send()
            .await?;
        let body = read_json(SALES_ENDPOINT, resp).await?;
        let receipt = SubmissionReceipt { body };
        tracing::info!(documents = ?receipt.document_ids(), "sales document accepted");
        Ok(receipt)
    }

    async fn validate_token(&self, token: &AuthToken) -> bool {
        let params = [("limit", "1".to_string())];
        match self
            .get(ReferenceKind::Organizations.endpoint(), &params, token)
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::info!(status = resp.status().as_u16(), "token rejected");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "token check failed");
                false
            }
        }
    }
}
