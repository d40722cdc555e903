use crate::http::{ClientError, PolicyCreationRequest, PolicyRecord, QuoteRequest, QuoteResponse};
use async_trait::async_trait;

/// Quote Service'e giden çağrılar. `ApiClient` gerçek implementasyondur;
/// testler kendi sahte servislerini takar.
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Tek bir provider'dan teklif al
    async fn request_single(
        &self,
        provider: &str,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, ClientError>;

    /// Tüm aktif provider'lardan teklif al (tek çağrı)
    async fn request_all(&self, request: &QuoteRequest) -> Result<Vec<QuoteResponse>, ClientError>;

    async fn create_policy(
        &self,
        request: &PolicyCreationRequest,
    ) -> Result<PolicyRecord, ClientError>;
}
