/// Tutarı Türkçe para formatında yazar: 4350.5 -> "₺4.350,50"
pub fn format_try(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}₺{},{:02}", sign, grouped, fraction)
}

/// Milisaniyeyi tek ondalıklı saniyeye çevirir: 1234 -> "1.2s"
pub fn format_seconds(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}
