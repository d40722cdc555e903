use crate::auth::SessionManager;
use crate::config::Config;
use crate::http::normalize::normalize_quotes;
use crate::http::{
    ChangePasswordRequest, ClientError, HealthResponse, LoginRequest, LoginResponse,
    PolicyCreationRequest, PolicyRecord, ProvidersResponse, QuoteRequest, QuoteResponse,
    RegisterRequest, UpdateProfileRequest, User, UserQuotesResponse,
};
use crate::providers::QuoteService;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Quote Service HTTP istemcisi. Her korumalı çağrıya bearer token ekler,
/// 401'i merkezi olarak ele alır.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionManager>) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_url,
            Duration::from_millis(config.request_timeout_ms),
            session,
        )
    }

    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionManager>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("HTTP istemcisi oluşturulamadı: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(builder.bearer_auth(token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        builder.send().await.map_err(|e| {
            tracing::error!("❌ İstek gönderilemedi: {}", e);
            ClientError::from(e)
        })
    }

    /// Korumalı uç noktaların yanıtı: 401 oturumu kapatır.
    async fn checked_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Err(ClientError::AuthExpired);
        }
        read_body(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let builder = self.authorized(self.http.get(self.url(path)))?;
        let response = self.send(builder).await?;
        let body = self.checked_body(response).await?;
        decode(&body)
    }

    async fn post_json<B, T>(&self, path: &str, payload: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.authorized(self.http.post(self.url(path)).json(payload))?;
        let response = self.send(builder).await?;
        let body = self.checked_body(response).await?;
        decode(&body)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.send(self.http.get(self.url("/health"))).await?;
        let body = read_body(response).await?;
        decode(&body)
    }

    /// Giriş. Buradaki 401 "şifre hatalı" demektir, oturum kapatma tetiklenmez.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send(self.http.post(self.url("/api/v1/auth/login")).json(&payload))
            .await?;
        let body = read_body(response).await?;
        let login: LoginResponse = decode(&body)?;

        self.establish(login)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, ClientError> {
        let payload = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let response = self
            .send(self.http.post(self.url("/api/v1/auth/register")).json(&payload))
            .await?;
        let body = read_body(response).await?;
        let login: LoginResponse = decode(&body)?;

        self.establish(login)
    }

    fn establish(&self, login: LoginResponse) -> Result<User, ClientError> {
        let user = login.user.clone();
        if let Err(e) = self.session.login(login.token, login.user) {
            // Oturum bellekte açık; sadece kalıcı kayıt başarısız.
            tracing::warn!("⚠️ Oturum kaydedilemedi: {}", e);
        }
        Ok(user)
    }

    pub async fn get_providers(&self) -> Result<ProvidersResponse, ClientError> {
        self.get_json("/api/v1/providers").await
    }

    pub async fn list_quotes(&self) -> Result<UserQuotesResponse, ClientError> {
        self.get_json("/api/v1/quotes").await
    }

    pub async fn list_policies(&self) -> Result<Vec<PolicyRecord>, ClientError> {
        self.get_json("/api/v1/policies").await
    }

    pub async fn update_profile(&self, patch: &UpdateProfileRequest) -> Result<User, ClientError> {
        let builder = self.authorized(
            self.http
                .put(self.url("/api/v1/users/profile"))
                .json(patch),
        )?;
        let response = self.send(builder).await?;
        let body = self.checked_body(response).await?;
        let user: User = decode(&body)?;

        if let Err(e) = self.session.update_profile(patch) {
            tracing::warn!("⚠️ Profil oturuma yazılamadı: {}", e);
        }
        Ok(user)
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ClientError> {
        let payload = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        let builder = self.authorized(
            self.http
                .put(self.url("/api/v1/users/password"))
                .json(&payload),
        )?;
        let response = self.send(builder).await?;
        self.checked_body(response).await?;
        Ok(())
    }
}

#[async_trait]
impl QuoteService for ApiClient {
    async fn request_single(
        &self,
        provider: &str,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, ClientError> {
        tracing::info!(
            "📤 {} provider'dan teklif isteniyor: request_id={}",
            provider,
            request.quote_meta.request_id
        );
        let quote: QuoteResponse = self
            .post_json(&format!("/api/v1/quote/{}", provider), request)
            .await?;
        tracing::info!("✅ {} - Teklif alındı: {} {}", quote.company, quote.premium.gross, quote.premium.currency);
        Ok(quote)
    }

    async fn request_all(&self, request: &QuoteRequest) -> Result<Vec<QuoteResponse>, ClientError> {
        tracing::info!(
            "📤 Tüm provider'lardan teklif isteniyor: request_id={}",
            request.quote_meta.request_id
        );
        let builder = self.authorized(self.http.post(self.url("/api/v1/quote")).json(request))?;
        let response = self.send(builder).await?;
        let body = self.checked_body(response).await?;
        let quotes = normalize_quotes(&body)?;
        tracing::info!("📊 {} teklif alındı", quotes.len());
        Ok(quotes)
    }

    async fn create_policy(
        &self,
        request: &PolicyCreationRequest,
    ) -> Result<PolicyRecord, ClientError> {
        tracing::info!(
            "📝 Poliçe kesiliyor: quote_id={}, {} taksit",
            request.quote_id(),
            request.installment_count()
        );
        let policy: PolicyRecord = self.post_json("/api/v1/policies", request).await?;
        tracing::info!("✅ Poliçe oluşturuldu: {}", policy.policy_number);
        Ok(policy)
    }
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();
    let body = response.bytes().await?.to_vec();

    if !status.is_success() {
        let err = ClientError::from_failure_body(status.as_u16(), &body);
        tracing::error!("❌ {} yanıtı: {}", status.as_u16(), err);
        return Err(err);
    }

    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|e| ClientError::UnexpectedShape(e.to_string()))
}
