//! 期間文字列から月ラベルを抽出
//!
//! "16th - 21th Feb 2026" → "Feb 2026"
//!
//! 月略称は Jan → Dec の順に照合し、最初に一致したものを採用する。
//! 文中の出現位置ではないため、複数の月を含む期間は暦順で早い方の月になる。

use crate::types::UNKNOWN_MONTH;
use regex::Regex;

/// 月略称（照合順）
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 期間文字列から "{Mon} {YYYY}" を返す。見つからなければ "Unknown"
pub fn extract_month_label(date_range: &str) -> String {
    lazy_static::lazy_static! {
        static ref MONTH_PATTERNS: Vec<(&'static str, Regex)> = MONTHS
            .iter()
            .map(|m| (*m, Regex::new(&format!(r"(?i)\b{}\s+(\d{{4}})\b", m)).unwrap()))
            .collect();
    }

    if date_range.trim().is_empty() {
        return UNKNOWN_MONTH.to_string();
    }

    MONTH_PATTERNS
        .iter()
        .find_map(|(month, re)| {
            re.captures(date_range)
                .map(|cap| format!("{} {}", month, &cap[1]))
        })
        .unwrap_or_else(|| UNKNOWN_MONTH.to_string())
}
