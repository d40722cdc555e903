use crate::http::{
    CoverageInfo, InsuredInfo, ProductType, QuoteMeta, QuoteRequest, VehicleInfo, VehicleUsage,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Doğrulanmış form verisi. Doğrulama formun işidir, burada tekrar yapılmaz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteForm {
    // Araç bilgileri
    pub plate: String,
    #[serde(default)]
    pub vin: Option<String>,
    pub brand: String,
    pub model: String,
    pub year: u16,
    #[serde(default)]
    pub usage: VehicleUsage,

    // Sigortalı bilgileri
    pub tckn: String,
    pub name: String,
    pub birth_date: String,
    pub phone: String,
    pub email: String,

    // Teminat bilgileri
    pub start_date: String,
    #[serde(default)]
    pub addons: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    webhook_url: Option<String>,
}

impl RequestBuilder {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self { webhook_url }
    }

    pub fn build(&self, form: &QuoteForm, product: ProductType) -> QuoteRequest {
        self.build_with_id(form, product, generate_request_id())
    }

    pub fn build_with_id(&self, form: &QuoteForm, product: ProductType, request_id: String) -> QuoteRequest {
        QuoteRequest {
            insured: InsuredInfo {
                tckn: form.tckn.clone(),
                name: form.name.clone(),
                birth_date: form.birth_date.clone(),
                phone: form.phone.clone(),
                email: form.email.clone(),
            },
            vehicle: VehicleInfo {
                plate: form.plate.clone(),
                vin: form.vin.clone().filter(|v| !v.is_empty()),
                brand: form.brand.clone(),
                model: form.model.clone(),
                year: form.year,
                usage: form.usage,
            },
            coverage: CoverageInfo {
                product_type: product,
                start_date: form.start_date.clone(),
                addons: form.addons.clone(),
            },
            quote_meta: QuoteMeta {
                request_id,
                webhook_url: self.webhook_url.clone(),
            },
        }
    }
}

/// `req_<unix ms>_<7 karakter base36>`. Çakışma ihtimali düşük ama
/// kriptografik olarak garanti değil.
pub fn generate_request_id() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let suffix: String = (0..7)
        .map(|_| {
            let c = BASE36[(n % 36) as usize] as char;
            n /= 36;
            c
        })
        .collect();

    format!("req_{}_{}", Utc::now().timestamp_millis(), suffix)
}
