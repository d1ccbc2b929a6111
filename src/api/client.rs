//! API gateway client: bearer attach, dispatch, classify, retry.
//!
//! [`ApiClient`] is the single choke point for all outbound HTTP calls.
//! Every failure path resolves to exactly one [`ApiError`]; no transport
//! exception ever reaches a caller raw. Retryable failures (transport
//! faults and 5xx) are retried sequentially up to the configured budget
//! with a fixed inter-attempt delay.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::dto::{
    LoginRequest, LoginResponse, MenuDish, MerchantSummary, OrderSummary, Recipe, RegisterRequest,
    SmsCodeRequest, UserProfile, UserUpdate,
};
use super::envelope::ApiEnvelope;
use super::paths;
use super::request::RequestDescriptor;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{MerchantId, SessionContext, UserId};

/// Token-aware HTTP client with classified retry.
///
/// Side effects are limited to network I/O and reading the session
/// credential: the client never mutates storage or triggers navigation.
/// Callers react to [`ApiError::Unauthenticated`] themselves.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
    retry_max: u32,
    retry_delay: Duration,
}

impl ApiClient {
    /// Creates a client from the given configuration and session context.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            retry_max: config.retry_max,
            retry_delay: config.retry_delay(),
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session context this client reads credentials from.
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Dispatches one logical call, retrying transient failures.
    ///
    /// Retries are sequential: a new attempt starts only after the
    /// previous one has been fully classified. The retry counter lives on
    /// the descriptor, so independent calls never share budget.
    ///
    /// # Errors
    ///
    /// Returns exactly one [`ApiError`] per rejected call, regardless of
    /// how many retries preceded it.
    pub async fn dispatch(
        &self,
        mut descriptor: RequestDescriptor,
    ) -> Result<serde_json::Value, ApiError> {
        loop {
            match self.attempt(&descriptor).await {
                Ok(data) => return Ok(data),
                Err(err) if err.is_retryable() && descriptor.retry_count() < self.retry_max => {
                    descriptor.record_retry();
                    tracing::warn!(
                        path = %descriptor.path,
                        retry = descriptor.retry_count(),
                        error = %err,
                        "transient failure, retrying"
                    );
                    self.wait_before_retry(descriptor.cancellation()).await?;
                }
                Err(err) => {
                    tracing::debug!(
                        path = %descriptor.path,
                        kind = err.kind_str(),
                        "request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Performs a single attempt: build, send, classify, strip envelope.
    async fn attempt(&self, descriptor: &RequestDescriptor) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}{}", self.base_url, descriptor.path);
        let mut request = self.http.request(descriptor.method.clone(), &url);

        if !descriptor.query.is_empty() {
            request = request.query(&descriptor.query);
        }
        if let Some(token) = self.session.bearer_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = match descriptor.cancellation() {
            Some(cancel) => tokio::select! {
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                result = request.send() => result,
            },
            None => request.send().await,
        };
        let response = response.map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope.into_data()
    }

    /// Sleeps the fixed inter-retry delay, short-circuiting on cancellation.
    async fn wait_before_retry(&self, cancel: Option<&CancellationToken>) -> Result<(), ApiError> {
        match cancel {
            Some(token) => tokio::select! {
                () = token.cancelled() => Err(ApiError::Cancelled),
                () = tokio::time::sleep(self.retry_delay) => Ok(()),
            },
            None => {
                tokio::time::sleep(self.retry_delay).await;
                Ok(())
            }
        }
    }
}

/// Typed endpoint surface. Thin wrappers over [`ApiClient::dispatch`]:
/// path from [`paths`], payload from the DTO, result decoded out of the
/// stripped envelope.
impl ApiClient {
    /// Logs in with phone + password or SMS code.
    ///
    /// On success the caller decides whether to install the returned
    /// identity into the session context.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on any failure, including rejected
    /// credentials (`Business` or `Unauthenticated`).
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::post(paths::LOGIN, to_body(request)?))
            .await?;
        decode(data)
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.dispatch(RequestDescriptor::post(paths::REGISTER, to_body(request)?))
            .await
            .map(|_| ())
    }

    /// Requests an SMS verification code.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn send_sms_code(&self, request: &SmsCodeRequest) -> Result<(), ApiError> {
        self.dispatch(RequestDescriptor::post(
            paths::SEND_SMS_CODE,
            to_body(request)?,
        ))
        .await
        .map(|_| ())
    }

    /// Fetches a user profile.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn user_profile(&self, user_id: UserId) -> Result<UserProfile, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::user_profile(user_id)))
            .await?;
        decode(data)
    }

    /// Applies a partial user update.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn update_user(&self, user_id: UserId, update: &UserUpdate) -> Result<(), ApiError> {
        self.dispatch(RequestDescriptor::put(
            paths::user_profile(user_id),
            to_body(update)?,
        ))
        .await
        .map(|_| ())
    }

    /// Fetches a user's preference blob.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn user_preferences(&self, user_id: UserId) -> Result<serde_json::Value, ApiError> {
        self.dispatch(RequestDescriptor::get(paths::user_preferences(user_id)))
            .await
    }

    /// Lists merchants.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn merchant_list(&self) -> Result<Vec<MerchantSummary>, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::MERCHANT_LIST))
            .await?;
        decode(data)
    }

    /// Fetches a single merchant.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn merchant_detail(
        &self,
        merchant_id: MerchantId,
    ) -> Result<MerchantSummary, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::merchant_detail(merchant_id)))
            .await?;
        decode(data)
    }

    /// Fetches a merchant's menu.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn merchant_menu(&self, merchant_id: MerchantId) -> Result<Vec<MenuDish>, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::merchant_menu(merchant_id)))
            .await?;
        decode(data)
    }

    /// Fetches today's recipes.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn today_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::RECIPE_TODAY))
            .await?;
        decode(data)
    }

    /// Fetches recommended recipes for the current session.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn recommend_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::RECIPE_RECOMMEND))
            .await?;
        decode(data)
    }

    /// Fetches the user's favorite recipes.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn favorite_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::RECIPE_FAVORITE))
            .await?;
        decode(data)
    }

    /// Lists a user's orders.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn user_orders(&self, user_id: UserId) -> Result<Vec<OrderSummary>, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::user_orders(user_id)))
            .await?;
        decode(data)
    }

    /// Fetches a single order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn order_detail(&self, order_id: &str) -> Result<OrderSummary, ApiError> {
        let data = self
            .dispatch(RequestDescriptor::get(paths::order_detail(order_id)))
            .await?;
        decode(data)
    }

    /// Fetches chat message records, optionally filtered by peer.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn message_records(
        &self,
        peer_id: Option<&str>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut descriptor = RequestDescriptor::get(paths::MESSAGE_RECORDS);
        if let Some(peer) = peer_id {
            descriptor = descriptor.with_query("peerId", peer);
        }
        self.dispatch(descriptor).await
    }

    /// Sends a chat message through the HTTP fallback path.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn send_message(&self, message: serde_json::Value) -> Result<(), ApiError> {
        self.dispatch(RequestDescriptor::post(paths::MESSAGE_SEND, message))
            .await
            .map(|_| ())
    }

    /// Lists a user's collection entries.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn user_collections(&self, user_id: UserId) -> Result<serde_json::Value, ApiError> {
        self.dispatch(RequestDescriptor::get(paths::user_collections(user_id)))
            .await
    }

    /// Removes a single collection entry.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn remove_collection(&self, collection_id: i64) -> Result<(), ApiError> {
        self.dispatch(RequestDescriptor::delete(paths::collection(collection_id)))
            .await
            .map(|_| ())
    }

    /// Clears every collection entry of a user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure.
    pub async fn clear_collections(&self, user_id: UserId) -> Result<(), ApiError> {
        self.dispatch(RequestDescriptor::delete(paths::user_collections(user_id)))
            .await
            .map(|_| ())
    }
}

/// Classifies a transport-level failure (no HTTP response received).
fn classify_transport(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout;
    }
    let code = if error.is_connect() {
        Some("connect")
    } else if error.is_request() {
        Some("abort")
    } else {
        None
    };
    ApiError::Transport {
        message: error.to_string(),
        code,
    }
}

/// Decodes envelope data into the expected response shape.
fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Serializes a request DTO into a JSON body.
fn to_body<T: serde::Serialize>(request: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(request).map_err(|e| ApiError::Internal(e.to_string()))
}
