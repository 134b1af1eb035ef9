//! Marketplace order-preparation API client.
//!
//! The backend turns a purchase intent into a ready-to-sign settlement
//! transaction: it validates the listing, runs its own gas estimation against
//! the buyer's current allowance and returns the call data together with a
//! validity window. This crate only consumes that interface.

use {
    alloy::primitives::{Address, Bytes, U256},
    bigdecimal::BigDecimal,
    chrono::{DateTime, Utc},
    reqwest::{Client, IntoUrl, Url},
    serde::{Deserialize, Deserializer, Serialize},
    serde_with::{DisplayFromStr, serde_as},
    thiserror::Error,
};

/// A purchase intent as the backend expects it.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareOrderRequest {
    pub asset_id: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub primary_amount: BigDecimal,
    pub primary_coin: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_coin: Option<String>,
    pub buyer: Address,
}

/// The transaction the backend prepared for the buyer's wallet.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub gas: Option<U256>,
    #[serde(default)]
    pub value: Option<U256>,
}

/// A backend-prepared order. Consumed exactly once; a fresh one must be
/// requested if `validity` elapses before submission.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreparedOrder {
    pub tx_data: TxData,
    #[serde(deserialize_with = "deserialize_epoch_seconds")]
    pub validity: DateTime<Utc>,
    /// Name of the chain this order settles on.
    pub chain: String,
}

impl PreparedOrder {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.validity <= now
    }
}

fn deserialize_epoch_seconds<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let epoch = i64::deserialize(deserializer)?;
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .ok_or_else(|| serde::de::Error::custom("validity timestamp out of range"))
}

/// Abstract order-preparation API. Provides a mockable implementation.
#[mockall::automock]
#[async_trait::async_trait]
pub trait OrderPreparing: Send + Sync {
    /// Asks the backend to prepare a settlement transaction for the given
    /// intent. The backend estimates gas against the buyer's current
    /// allowance, so any required approval must already be confirmed.
    async fn prepare_order(
        &self,
        request: &PrepareOrderRequest,
    ) -> Result<PreparedOrder, OrderApiError>;
}

#[derive(Debug, Error)]
pub enum OrderApiError {
    /// The backend answered but reported a failure or returned no payload.
    #[error("order preparation rejected: {0}")]
    Rejected(String),

    #[error("error ({0}) for response {1}")]
    DeserializeError(serde_json::Error, String),

    // Recovered a response but failed on the async call of response.text().
    #[error(transparent)]
    TextFetch(reqwest::Error),

    // Connectivity or non-response error.
    #[error("failed on send")]
    Send(reqwest::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponse<Ok> {
    ResponseOk(Ok),
    ResponseErr { message: String },
}

/// Order API client implementation.
#[derive(Debug)]
pub struct DefaultOrderApi {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl DefaultOrderApi {
    pub fn new(
        base_url: impl IntoUrl,
        api_key: Option<String>,
        client: Client,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client,
            base_url: base_url.into_url()?,
            api_key,
        })
    }

    async fn request<T: for<'a> serde::Deserialize<'a>>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, OrderApiError> {
        tracing::debug!(%url, "querying order api");

        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        let response_text = request
            .send()
            .await
            .map_err(OrderApiError::Send)?
            .text()
            .await
            .map_err(OrderApiError::TextFetch)?;
        tracing::debug!(body = %response_text, "order api response");

        match serde_json::from_str::<RawResponse<T>>(&response_text) {
            Ok(RawResponse::ResponseOk(response)) => Ok(response),
            Ok(RawResponse::ResponseErr { message }) => Err(OrderApiError::Rejected(message)),
            Err(err) => Err(OrderApiError::DeserializeError(err, response_text)),
        }
    }
}

#[async_trait::async_trait]
impl OrderPreparing for DefaultOrderApi {
    async fn prepare_order(
        &self,
        request: &PrepareOrderRequest,
    ) -> Result<PreparedOrder, OrderApiError> {
        let url = self
            .base_url
            .join("api/v1/orders/prepare")
            .expect("unexpectedly invalid URL segment");
        self.request(url, request).await
    }
}
