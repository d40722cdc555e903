#![allow(dead_code)]

use sigorta_client::auth::{MemorySessionStore, Navigator, SessionManager, StoredSession};
use sigorta_client::http::{
    CoverageInfo, InsuredInfo, Installment, PremiumDetail, ProductType, QuoteMeta, QuoteRequest,
    QuoteResponse, Timings, User, VehicleInfo, VehicleUsage,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

pub fn agent() -> User {
    User {
        id: "7f1c0d5e-0000-4000-8000-000000000001".to_string(),
        email: "agent@eesigorta.com".to_string(),
        name: "Test Acente".to_string(),
        role: "agent".to_string(),
        phone: None,
    }
}

/// Giriş yapılmış oturum + yönlendirme kaydı
pub fn logged_in_session(token: &str) -> (Arc<SessionManager>, Arc<MemorySessionStore>, Arc<RecordingNavigator>) {
    let store = Arc::new(MemorySessionStore::with_session(StoredSession {
        token: token.to_string(),
        user: agent(),
    }));
    let nav = Arc::new(RecordingNavigator::default());
    let session = Arc::new(SessionManager::hydrate(store.clone(), nav.clone(), "/login"));
    (session, store, nav)
}

pub fn quote_request(request_id: &str) -> QuoteRequest {
    QuoteRequest {
        insured: InsuredInfo {
            tckn: "12345678901".to_string(),
            name: "Test User".to_string(),
            birth_date: "1990-01-01".to_string(),
            phone: "5551234567".to_string(),
            email: "test@example.com".to_string(),
        },
        vehicle: VehicleInfo {
            plate: "34ABC123".to_string(),
            vin: None,
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2020,
            usage: VehicleUsage::Hususi,
        },
        coverage: CoverageInfo {
            product_type: ProductType::Trafik,
            start_date: "2026-10-17".to_string(),
            addons: vec![],
        },
        quote_meta: QuoteMeta {
            request_id: request_id.to_string(),
            webhook_url: None,
        },
    }
}

pub fn quote(company: &str, gross: f64, counts: &[u8], scrape_ms: Option<u64>) -> QuoteResponse {
    QuoteResponse {
        request_id: "req_1760000000000_abc1234".to_string(),
        company: company.to_string(),
        product_type: "trafik".to_string(),
        premium: PremiumDetail {
            net: gross / 1.18,
            gross,
            taxes: gross - gross / 1.18,
            currency: "TRY".to_string(),
        },
        installments: counts
            .iter()
            .map(|&count| Installment {
                count,
                per_installment: gross / count as f64,
                total: gross,
            })
            .collect(),
        coverages: vec![],
        warnings: vec![],
        raw: None,
        timings: scrape_ms.map(|scrape_ms| Timings {
            queued_ms: 0,
            scrape_ms,
        }),
    }
}

pub fn quote_json(company: &str, gross: f64) -> serde_json::Value {
    serde_json::to_value(quote(company, gross, &[1, 3], Some(2500))).unwrap()
}
