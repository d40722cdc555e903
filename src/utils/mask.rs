/// Log'lara giden hassas verileri (token, TCKN, telefon) maskeler.
pub fn mask_sensitive(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    // İlk 2 ve son 2 karakter hariç hepsini maskele
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[len - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(len - 4), tail)
}
