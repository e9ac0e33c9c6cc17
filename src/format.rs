//! Presentation formatting shared by the landing page and the dashboard.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Characters left as-is by JavaScript's `encodeURIComponent`; click-to-chat
/// links expect spaces as `%20`, never `+`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Format a price as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// Matches `Intl.NumberFormat('pt-BR', { style: 'currency', currency: 'BRL' })`,
/// including the non-breaking space after the symbol.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_brl(price: f64) -> String {
    if !price.is_finite() {
        return "R$\u{a0}—".to_owned();
    }
    let cents = (price.abs() * 100.0).round() as u64;
    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$\u{a0}{},{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Five-character star bar: filled stars for the rating, hollow for the rest.
#[must_use]
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(crate::models::MAX_RATING));
    let total = usize::from(crate::models::MAX_RATING);
    std::iter::repeat_n(FILLED_STAR, filled)
        .chain(std::iter::repeat_n(EMPTY_STAR, total - filled))
        .collect()
}

/// `dd/mm/yyyy, HH:MM` in the given whole-hour offset from UTC.
#[must_use]
pub fn format_date(ts: OffsetDateTime, utc_offset_hours: i8) -> String {
    let offset = UtcOffset::from_hms(utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
    ts.to_offset(offset)
        .format(format_description!("[day]/[month]/[year], [hour]:[minute]"))
        .unwrap_or_default()
}

/// Click-to-chat link asking about a specific service.
#[must_use]
pub fn whatsapp_link(phone: &str, service_title: &str) -> String {
    let message = format!("Olá! Gostaria de saber mais sobre o serviço: {service_title}");
    let phone: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{phone}?text={}", utf8_percent_encode(&message, URI_COMPONENT))
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
