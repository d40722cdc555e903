use crate::http::{ClientError, QuoteResponse};
use serde::Deserialize;

/// `/api/v1/quote` bazen dizi, bazen tek nesne döner.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuotePayload {
    Many(Vec<QuoteResponse>),
    Wrapped { quotes: Vec<QuoteResponse> },
    One(Box<QuoteResponse>),
}

/// Toplu teklif yanıtının farklı biçimleri yalnızca burada birleştirilir.
pub fn normalize_quotes(body: &[u8]) -> Result<Vec<QuoteResponse>, ClientError> {
    let payload: QuotePayload = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("⚠️ Teklif yanıtı beklenen formatta değil: {}", e);
        ClientError::UnexpectedShape(
            "teklif listesi, {quotes: [...]} veya tek teklif bekleniyordu".to_string(),
        )
    })?;

    let quotes = match payload {
        QuotePayload::Many(quotes) => quotes,
        QuotePayload::Wrapped { quotes } => quotes,
        QuotePayload::One(quote) => {
            tracing::debug!("Tek teklif nesnesi listeye sarıldı: {}", quote.company);
            vec![*quote]
        }
    };

    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote(company: &str, gross: f64) -> serde_json::Value {
        json!({
            "requestId": "req_1",
            "company": company,
            "productType": "trafik",
            "premium": { "net": gross / 1.18, "gross": gross, "taxes": gross - gross / 1.18, "currency": "TRY" }
        })
    }

    #[test]
    fn keeps_arrays_in_order() {
        let body = json!([quote("Sompo", 1500.0), quote("Quick", 1200.0)]).to_string();
        let quotes = normalize_quotes(body.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].company, "Sompo");
        assert_eq!(quotes[1].company, "Quick");
    }

    #[test]
    fn wraps_single_object() {
        let body = quote("Sompo", 1500.0).to_string();
        let quotes = normalize_quotes(body.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].company, "Sompo");
    }

    #[test]
    fn unwraps_quotes_field() {
        let body = json!({ "quotes": [quote("Axa", 990.0)] }).to_string();
        let quotes = normalize_quotes(body.as_bytes()).unwrap();
        assert_eq!(quotes[0].company, "Axa");
    }

    #[test]
    fn rejects_other_shapes() {
        let err = normalize_quotes(br#"{"ok":true}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedShape(_)));

        let err = normalize_quotes(b"not json").unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedShape(_)));
    }
}
