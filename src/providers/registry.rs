use crate::http::{ProviderInfo, ProvidersResponse};

/// `/api/v1/providers` yanıtından kurulan istemci tarafı provider listesi.
pub struct ProviderRegistry {
    providers: Vec<ProviderInfo>,
}

impl ProviderRegistry {
    pub fn from_response(response: ProvidersResponse) -> Self {
        if response.total != response.providers.len() {
            tracing::debug!(
                "Provider sayısı uyuşmuyor: total={}, liste={}",
                response.total,
                response.providers.len()
            );
        }
        Self {
            providers: response.providers,
        }
    }

    pub fn get_provider(&self, name: &str) -> Option<&ProviderInfo> {
        self.providers
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn get_active_providers(&self) -> Vec<&ProviderInfo> {
        self.providers.iter().filter(|p| p.active).collect()
    }

    pub fn get_all_providers(&self) -> &[ProviderInfo] {
        &self.providers
    }

    /// Ürünü destekleyen aktif provider'lar
    pub fn active_for_product(&self, product: &str) -> Vec<&ProviderInfo> {
        self.providers
            .iter()
            .filter(|p| p.active)
            .filter(|p| p.supported_products.iter().any(|s| s.eq_ignore_ascii_case(product)))
            .collect()
    }
}

/// Şirket adının tam hali ("Sompo" -> "Sompo Sigorta")
pub fn display_name(company: &str) -> String {
    match company {
        "Sompo" | "Quick" | "Axa" | "Anadolu" => format!("{} Sigorta", company),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::from_response(ProvidersResponse {
            providers: vec![
                ProviderInfo {
                    name: "Sompo".to_string(),
                    active: true,
                    reason: None,
                    supported_products: vec!["trafik".to_string(), "kasko".to_string()],
                },
                ProviderInfo {
                    name: "Quick".to_string(),
                    active: false,
                    reason: Some("Henüz kayıtlı değil".to_string()),
                    supported_products: vec!["trafik".to_string()],
                },
            ],
            total: 2,
            active_count: 1,
        })
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(registry().get_provider("sompo").unwrap().name, "Sompo");
        assert!(registry().get_provider("axa").is_none());
    }

    #[test]
    fn filters_active_by_product() {
        let reg = registry();
        assert_eq!(reg.get_active_providers().len(), 1);
        assert_eq!(reg.active_for_product("kasko").len(), 1);
        assert!(reg.active_for_product("konut").is_empty());
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name("Anadolu"), "Anadolu Sigorta");
        assert_eq!(display_name("Allianz"), "Allianz");
    }
}
