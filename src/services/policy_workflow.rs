use crate::http::{
    ClientError, Installment, PaymentMethod, PolicyCreationRequest, PolicyRecord, QuoteResponse,
};
use crate::providers::QuoteService;
use thiserror::Error;

/// Ekranda gösterilen komisyon oranı. Sunucuya gönderilmez.
pub const COMMISSION_RATE: f64 = 0.10;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("'{action}' işlemi '{state}' durumunda yapılamaz")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Poliçe zaten oluşturuluyor")]
    SubmissionInFlight,

    #[error("Bu teklif için taksit seçeneği yok")]
    NoInstallments,

    #[error("Taksit seçimi seçili teklife ait değil")]
    ForeignChoice,

    #[error("Poliçe oluşturulamadı: {0}")]
    Submission(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QuoteKey {
    request_id: String,
    company: String,
    offered: Vec<u8>,
}

impl QuoteKey {
    fn of(quote: &QuoteResponse) -> Self {
        Self {
            request_id: quote.request_id.clone(),
            company: quote.company.clone(),
            offered: quote.installments.iter().map(|i| i.count).collect(),
        }
    }
}

/// Teklifin kendi taksit listesinden alınmış taksit sayısı. Dışarıdan
/// oluşturulamaz; tek kaynağı `installment_options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentChoice {
    quote: QuoteKey,
    count: u8,
}

impl InstallmentChoice {
    pub fn count(&self) -> u8 {
        self.count
    }
}

#[derive(Debug, Clone)]
pub struct InstallmentOption {
    pub choice: InstallmentChoice,
    pub per_installment: f64,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct PolicyDraft {
    pub quote: QuoteResponse,
    pub payment_method: PaymentMethod,
    pub installment: InstallmentChoice,
}

impl PolicyDraft {
    fn to_request(&self) -> PolicyCreationRequest {
        PolicyCreationRequest::new(
            self.quote.request_id.clone(),
            self.payment_method,
            self.installment.count,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub enum PolicyState {
    #[default]
    Idle,
    Selecting {
        quote: QuoteResponse,
    },
    Configuring {
        draft: PolicyDraft,
    },
    Submitting {
        draft: PolicyDraft,
    },
    Success {
        policy: PolicyRecord,
    },
    /// Seçimler korunur; yapılandırmaya ya da yeniden göndermeye açıktır.
    Failed {
        draft: PolicyDraft,
        error: ClientError,
    },
}

impl PolicyState {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyState::Idle => "Idle",
            PolicyState::Selecting { .. } => "Selecting",
            PolicyState::Configuring { .. } => "Configuring",
            PolicyState::Submitting { .. } => "Submitting",
            PolicyState::Success { .. } => "Success",
            PolicyState::Failed { .. } => "Failed",
        }
    }
}

/// Seçilen teklifi poliçeye çeviren akış.
#[derive(Debug, Default)]
pub struct PolicyWorkflow {
    state: PolicyState,
}

impl PolicyWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PolicyState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, PolicyState::Submitting { .. })
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    pub fn quote(&self) -> Option<&QuoteResponse> {
        match &self.state {
            PolicyState::Selecting { quote } => Some(quote),
            PolicyState::Configuring { draft }
            | PolicyState::Submitting { draft }
            | PolicyState::Failed { draft, .. } => Some(&draft.quote),
            PolicyState::Idle | PolicyState::Success { .. } => None,
        }
    }

    pub fn draft(&self) -> Option<&PolicyDraft> {
        match &self.state {
            PolicyState::Configuring { draft }
            | PolicyState::Submitting { draft }
            | PolicyState::Failed { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn select(&mut self, quote: QuoteResponse) -> Result<(), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::SubmissionInFlight);
        }
        tracing::debug!("Teklif seçildi: {} {}", quote.company, quote.premium.gross);
        self.state = PolicyState::Selecting { quote };
        Ok(())
    }

    /// Seçili teklifin taksit seçenekleri; kullanıcıya sadece bunlar sunulur.
    pub fn installment_options(&self) -> Vec<InstallmentOption> {
        let Some(quote) = self.quote() else {
            return Vec::new();
        };
        let key = QuoteKey::of(quote);

        quote
            .installments
            .iter()
            .map(|inst: &Installment| InstallmentOption {
                choice: InstallmentChoice {
                    quote: key.clone(),
                    count: inst.count,
                },
                per_installment: inst.per_installment,
                total: inst.total,
            })
            .collect()
    }

    pub fn configure(
        &mut self,
        payment_method: PaymentMethod,
        installment: InstallmentChoice,
    ) -> Result<(), WorkflowError> {
        let quote = match &self.state {
            PolicyState::Selecting { quote } => quote.clone(),
            PolicyState::Configuring { draft } | PolicyState::Failed { draft, .. } => {
                draft.quote.clone()
            }
            PolicyState::Submitting { .. } => return Err(WorkflowError::SubmissionInFlight),
            _ => return Err(self.invalid("configure")),
        };

        let offered = quote.installments.iter().any(|i| i.count == installment.count);
        if installment.quote != QuoteKey::of(&quote) || !offered {
            return Err(WorkflowError::ForeignChoice);
        }

        self.state = PolicyState::Configuring {
            draft: PolicyDraft {
                quote,
                payment_method,
                installment,
            },
        };
        Ok(())
    }

    /// Kredi kartı ve en küçük taksit sayısı ile başlat.
    pub fn configure_defaults(&mut self) -> Result<(), WorkflowError> {
        let first = self
            .installment_options()
            .into_iter()
            .min_by_key(|o| o.choice.count)
            .ok_or(WorkflowError::NoInstallments)?;
        self.configure(PaymentMethod::default(), first.choice)
    }

    /// Failed -> Configuring, seçimler aynen korunur.
    pub fn dismiss_error(&mut self) -> Result<(), WorkflowError> {
        match std::mem::take(&mut self.state) {
            PolicyState::Failed { draft, .. } => {
                self.state = PolicyState::Configuring { draft };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("dismiss_error"))
            }
        }
    }

    pub fn commission(&self) -> Option<f64> {
        self.quote().map(|q| q.premium.gross * COMMISSION_RATE)
    }

    pub fn selected_installment(&self) -> Option<&Installment> {
        let draft = self.draft()?;
        draft
            .quote
            .installments
            .iter()
            .find(|i| i.count == draft.installment.count)
    }

    pub fn begin_submit(&mut self) -> Result<PolicyCreationRequest, WorkflowError> {
        match std::mem::take(&mut self.state) {
            PolicyState::Configuring { draft } | PolicyState::Failed { draft, .. } => {
                let request = draft.to_request();
                self.state = PolicyState::Submitting { draft };
                Ok(request)
            }
            submitting @ PolicyState::Submitting { .. } => {
                self.state = submitting;
                Err(WorkflowError::SubmissionInFlight)
            }
            other => {
                self.state = other;
                Err(self.invalid("submit"))
            }
        }
    }

    pub fn complete(&mut self, result: Result<PolicyRecord, ClientError>) -> Result<(), WorkflowError> {
        let draft = match std::mem::take(&mut self.state) {
            PolicyState::Submitting { draft } => draft,
            other => {
                self.state = other;
                return Err(self.invalid("complete"));
            }
        };

        self.state = match result {
            Ok(policy) => {
                tracing::info!("✅ Poliçe No: {}", policy.policy_number);
                PolicyState::Success { policy }
            }
            // Oturum kapandı, kullanıcı login'e yönlendirildi.
            Err(ClientError::AuthExpired) => PolicyState::Idle,
            Err(error) => {
                tracing::warn!("⚠️ Poliçe oluşturulamadı: {}", error);
                PolicyState::Failed { draft, error }
            }
        };
        Ok(())
    }

    /// Tek gönderim: istek bir kez gider, sonuç duruma işlenir.
    pub async fn submit<S>(&mut self, service: &S) -> Result<PolicyRecord, WorkflowError>
    where
        S: QuoteService + ?Sized,
    {
        let request = self.begin_submit()?;
        let result = service.create_policy(&request).await;
        self.complete(result.clone())?;
        result.map_err(WorkflowError::from)
    }

    pub fn close(&mut self) -> Result<(), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::SubmissionInFlight);
        }
        self.state = PolicyState::Idle;
        Ok(())
    }
}
