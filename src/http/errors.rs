use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_EXPIRED_MESSAGE: &str = "Oturum süresi doldu. Lütfen tekrar giriş yapın.";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Bilinmeyen hata";
pub const GENERIC_FAILURE_MESSAGE: &str = "İşlem başarısız";

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// 401: oturum SessionManager tarafından zaten kapatıldı.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    AuthExpired,

    #[error("Oturum bulunamadı. Lütfen giriş yapın.")]
    NotAuthenticated,

    #[error("{message}")]
    Provider {
        status: u16,
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Bağlantı hatası: {0}")]
    Network(String),

    #[error("Beklenmeyen yanıt formatı: {0}")]
    UnexpectedShape(String),

    #[error("{}", UNKNOWN_FAILURE_MESSAGE)]
    Unknown { status: u16 },
}

/// Quote Service'in hata kodları
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    InternalServerError,
    LoginFailed,
    FormValidation,
    Blocked,
    HumanActionRequired,
    Timeout,
    ParseError,
    ProviderInactive,
    WebDriverError,
    Unknown,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub request_id: Option<String>,
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default = "unknown_code")]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

fn unknown_code() -> ErrorCode {
    ErrorCode::Unknown
}

impl ClientError {
    /// Non-2xx gövdesini hata zarfı olarak çözer.
    pub fn from_failure_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => ClientError::Provider {
                status,
                code: envelope.error.code,
                message: envelope
                    .error
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                details: envelope.error.details,
            },
            Err(e) => {
                tracing::debug!("Hata gövdesi çözülemedi ({}): {}", status, e);
                ClientError::Unknown { status }
            }
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
