use crate::http::{ClientError, QuoteRequest, QuoteResponse};
use crate::providers::QuoteService;
use crate::services::comparison::{compare, Comparison};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteMode {
    /// Tüm provider'lardan karşılaştırmalı teklif
    Compare,
    Single(String),
}

#[derive(Debug, Clone, Default)]
pub enum BoardState {
    #[default]
    Empty,
    Loading,
    Ready(Vec<QuoteResponse>),
    Failed(ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// Daha yeni bir gönderim başladığı için sonuç atıldı.
    Stale,
}

struct Inner {
    generation: u64,
    state: BoardState,
}

/// Bir teklif formunun sonuç alanı. Her gönderim yeni bir nesil alır;
/// yalnızca en son neslin sonucu uygulanır.
pub struct QuoteBoard {
    inner: Mutex<Inner>,
}

impl Default for QuoteBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                state: BoardState::Empty,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = BoardState::Loading;
        Ticket(inner.generation)
    }

    pub fn resolve(
        &self,
        ticket: Ticket,
        result: Result<Vec<QuoteResponse>, ClientError>,
    ) -> Resolution {
        let mut inner = self.lock();
        if ticket.0 != inner.generation {
            tracing::debug!(
                "Eski teklif sonucu atıldı: nesil {} (güncel {})",
                ticket.0,
                inner.generation
            );
            return Resolution::Stale;
        }

        inner.state = match result {
            Ok(quotes) => BoardState::Ready(quotes),
            // Oturum zaten kapatıldı; sayfa bu hatayı göstermez.
            Err(ClientError::AuthExpired) => BoardState::Empty,
            Err(e) => BoardState::Failed(e),
        };
        Resolution::Applied
    }

    pub async fn submit<S>(&self, service: &S, mode: &QuoteMode, request: &QuoteRequest) -> Resolution
    where
        S: QuoteService + ?Sized,
    {
        let ticket = self.begin();

        let result = match mode {
            QuoteMode::Compare => {
                tracing::info!("🔄 Tüm sigorta şirketlerinden teklif alınıyor...");
                service.request_all(request).await
            }
            QuoteMode::Single(provider) => service
                .request_single(provider, request)
                .await
                .map(|quote| vec![quote]),
        };

        match &result {
            Ok(quotes) => tracing::info!("✅ {} teklif alındı", quotes.len()),
            Err(e) => tracing::warn!("⚠️ Teklif alınamadı: {}", e),
        }

        self.resolve(ticket, result)
    }

    pub fn state(&self) -> BoardState {
        self.lock().state.clone()
    }

    /// Yükleme sürerken form tekrar gönderilmemeli.
    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, BoardState::Loading)
    }

    pub fn quotes(&self) -> Vec<QuoteResponse> {
        match &self.lock().state {
            BoardState::Ready(quotes) => quotes.clone(),
            _ => Vec::new(),
        }
    }

    /// `f`'i sıralanmış teklifler üzerinde çalıştırır; sıralanacak teklif yoksa `None`.
    pub fn with_comparison<R>(&self, f: impl FnOnce(Comparison<'_>) -> R) -> Option<R> {
        let inner = self.lock();
        match &inner.state {
            BoardState::Ready(quotes) if !quotes.is_empty() => Some(f(compare(quotes))),
            _ => None,
        }
    }

    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = BoardState::Empty;
    }
}
