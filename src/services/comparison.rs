use crate::http::QuoteResponse;
use crate::utils::format_seconds;

/// Sıralama sonucu. Girdi dilimini ödünç alır, kopyalamaz.
#[derive(Debug)]
pub struct Comparison<'a> {
    quotes: &'a [QuoteResponse],
    cheapest: usize,
    fastest: usize,
    order: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct RankedQuote<'a> {
    pub quote: &'a QuoteResponse,
    pub is_cheapest: bool,
    pub is_fastest: bool,
}

/// Teklif listesini sıralar.
///
/// # Panics
///
/// `quotes` boşsa `cheapest` ve `fastest` panic eder. Karşılaştırma en az
/// bir teklif geldikten sonra yapılır.
pub fn compare(quotes: &[QuoteResponse]) -> Comparison<'_> {
    Comparison {
        quotes,
        cheapest: cheapest_index(quotes),
        fastest: fastest_index(quotes),
        order: display_order(quotes),
    }
}

/// En düşük brüt prim (`display_order` ile aynı `total_cmp` sırası); eşitlikte girdideki ilk teklif.
pub fn cheapest_index(quotes: &[QuoteResponse]) -> usize {
    let mut best = 0;
    for (i, q) in quotes.iter().enumerate().skip(1) {
        if q.premium.gross.total_cmp(&quotes[best].premium.gross).is_lt() {
            best = i;
        }
    }
    best
}

/// En kısa scrape süresi. Süresi olmayan teklif 0 sayılır.
pub fn fastest_index(quotes: &[QuoteResponse]) -> usize {
    let scrape_ms = |q: &QuoteResponse| q.timings.map(|t| t.scrape_ms).unwrap_or(0);

    let mut best = 0;
    for (i, q) in quotes.iter().enumerate().skip(1) {
        if scrape_ms(q) < scrape_ms(&quotes[best]) {
            best = i;
        }
    }
    best
}

/// Brüt prime göre artan, kararlı sıralama (indeksler)
pub fn display_order(quotes: &[QuoteResponse]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..quotes.len()).collect();
    order.sort_by(|&a, &b| quotes[a].premium.gross.total_cmp(&quotes[b].premium.gross));
    order
}

impl<'a> Comparison<'a> {
    pub fn cheapest(&self) -> &'a QuoteResponse {
        let quotes = self.quotes;
        &quotes[self.cheapest]
    }

    pub fn fastest(&self) -> &'a QuoteResponse {
        let quotes = self.quotes;
        &quotes[self.fastest]
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn ordered(&self) -> impl Iterator<Item = &'a QuoteResponse> + '_ {
        let quotes = self.quotes;
        self.order.iter().map(move |&i| &quotes[i])
    }

    pub fn ranked(&self) -> impl Iterator<Item = RankedQuote<'a>> + '_ {
        let quotes = self.quotes;
        self.order.iter().map(move |&i| RankedQuote {
            quote: &quotes[i],
            is_cheapest: i == self.cheapest,
            is_fastest: i == self.fastest,
        })
    }

    /// "En hızlı: 1.2s" rozetindeki süre
    pub fn fastest_seconds(&self) -> String {
        format_seconds(self.fastest().timings.map(|t| t.scrape_ms).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{PremiumDetail, Timings};

    fn quote(company: &str, gross: f64, scrape_ms: Option<u64>) -> QuoteResponse {
        QuoteResponse {
            request_id: "req_1".to_string(),
            company: company.to_string(),
            product_type: "trafik".to_string(),
            premium: PremiumDetail {
                net: gross,
                gross,
                taxes: 0.0,
                currency: "TRY".to_string(),
            },
            installments: vec![],
            coverages: vec![],
            warnings: vec![],
            raw: None,
            timings: scrape_ms.map(|scrape_ms| Timings {
                queued_ms: 0,
                scrape_ms,
            }),
        }
    }

    #[test]
    fn cheapest_tie_goes_to_first_and_order_is_stable() {
        let quotes = vec![
            quote("A", 1500.0, Some(3000)),
            quote("B", 1200.0, Some(2000)),
            quote("C", 1200.0, Some(1000)),
        ];
        let cmp = compare(&quotes);

        assert_eq!(cmp.cheapest().company, "B");
        let order: Vec<&str> = cmp.ordered().map(|q| q.company.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(cmp.fastest().company, "C");
    }

    #[test]
    fn cheapest_and_order_agree_on_signed_zero() {
        let quotes = vec![quote("Sompo", 0.0, None), quote("Quick", -0.0, None)];
        let cmp = compare(&quotes);

        assert_eq!(cmp.cheapest().company, "Quick");
        assert_eq!(cmp.ordered().next().unwrap().company, "Quick");
        assert_eq!(display_order(&quotes)[0], cheapest_index(&quotes));
    }

    #[test]
    fn missing_timings_count_as_zero() {
        let quotes = vec![
            quote("Sompo", 1000.0, Some(1)),
            quote("Quick", 2000.0, None),
            quote("Axa", 900.0, Some(0)),
        ];
        let cmp = compare(&quotes);

        assert_eq!(cmp.fastest().company, "Quick");
        assert_eq!(cmp.fastest_seconds(), "0.0s");
    }

    #[test]
    fn flags_use_position_not_request_id() {
        let quotes = vec![quote("Sompo", 1000.0, Some(500)), quote("Quick", 800.0, Some(900))];
        let cmp = compare(&quotes);
        let ranked: Vec<RankedQuote> = cmp.ranked().collect();

        assert_eq!(ranked[0].quote.company, "Quick");
        assert!(ranked[0].is_cheapest && !ranked[0].is_fastest);
        assert!(!ranked[1].is_cheapest && ranked[1].is_fastest);
    }

    #[test]
    fn single_quote_is_both() {
        let quotes = vec![quote("Sompo", 1000.0, None)];
        let cmp = compare(&quotes);
        let ranked: Vec<RankedQuote> = cmp.ranked().collect();
        assert!(ranked[0].is_cheapest && ranked[0].is_fastest);
    }
}
