//! Presentation helpers shared by the report renderers.

use crate::engine::Period;
use chrono::Datelike;

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Human readable label for a period: `15/06/2024`, `Junho 2024` or `2024`.
pub fn period_label(period: &Period) -> String {
    match period {
        Period::Day(date) => date.format("%d/%m/%Y").to_string(),
        Period::Month(first_day) => format!(
            "{} {}",
            MONTH_NAMES[first_day.month0() as usize],
            first_day.year()
        ),
        Period::Year(year) => year.to_string(),
    }
}

/// Formats an amount in Kwanza, e.g. `1 234 567,89 Kz`.
pub fn format_kwanza(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02} Kz", sign, grouped, cents % 100)
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}
