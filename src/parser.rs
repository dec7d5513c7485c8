use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::TransactionCandidate;

// Amount: digits with optional thousands commas, followed by the won marker.
static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\d,]+)\s*원").unwrap());

// Date patterns: MM/dd (also MM.dd) with optional HH:mm. Notification text
// never carries a year, so the current year is assumed.
static DATE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/.:](\d{1,2})\s+(\d{1,2}):(\d{2})").unwrap());
static DATE_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})[/.](\d{1,2})").unwrap());

// Noise rules stripped before vendor selection, applied in this order.
// Each rule is independent; replacement is always a single space.
static NOISE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[\d,]+\s*원",                // amount
        r"\d{1,2}[/.]\d{1,2}",         // date
        r"\d{1,2}:\d{2}",              // time
        r"승인|입금|출금|결제|이체|취소", // transaction-type keywords
        r"\(.*?\)",                    // parenthesized spans (card no., payer)
        r"[가-힣]{1,3}\*[가-힣]님?",    // masked names (김*수님)
        r"[가-힣]{2,4}님",              // honorific-suffixed names
        r"\b\d{4}\b",                  // bare 4-digit runs (card fragments)
        // Card-issuer names. Bank app names (토스뱅크, 카카오뱅크) are kept:
        // for deposit notices they are often the only usable vendor token.
        r"신한카드|KB국민카드|우리카드|하나카드|삼성카드|현대카드|롯데카드|NH카드|BC카드",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w가-힣\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract a transaction candidate from combined notification text.
///
/// Pure and deterministic apart from the wall-clock fallback when the text
/// carries no date. Returns `None` when no amount or no vendor can be
/// derived; that is an expected outcome for non-transaction notifications,
/// not an error.
pub fn extract(text: &str, bank: &str) -> Option<TransactionCandidate> {
    extract_at(text, bank, Local::now().naive_local())
}

/// Same as [`extract`] with an explicit "now" for the no-date fallback.
pub fn extract_at(text: &str, bank: &str, now: NaiveDateTime) -> Option<TransactionCandidate> {
    let amount = extract_amount(text)?;
    let occurred_at = extract_timestamp(text, now);
    let vendor = extract_vendor(text)?;

    Some(TransactionCandidate {
        amount,
        vendor,
        occurred_at,
        bank: bank.to_string(),
    })
}

/// "15,000원" → 15000. The first currency-marked run wins; if its digits do
/// not parse (e.g. a lone comma) the extraction fails rather than trying a
/// later match.
fn extract_amount(text: &str) -> Option<i64> {
    let caps = AMOUNT.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// MM/dd HH:mm → date-time in the current year, seconds zeroed.
/// MM/dd alone → midnight. Neither, or a calendar-invalid match → `now`.
fn extract_timestamp(text: &str, now: NaiveDateTime) -> NaiveDateTime {
    if let Some(ts) = full_date_time(text, now.year()) {
        return ts;
    }
    if let Some(ts) = date_only(text, now.year()) {
        return ts;
    }
    now
}

fn full_date_time(text: &str, year: i32) -> Option<NaiveDateTime> {
    let caps = DATE_TIME.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let hour: u32 = caps[3].parse().ok()?;
    let minute: u32 = caps[4].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

fn date_only(text: &str, year: i32) -> Option<NaiveDateTime> {
    let caps = DATE_ONLY.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Strip noise, collapse whitespace, then pick the longest surviving token
/// of at least 2 characters. Ties go to the leftmost token so repeated
/// extraction is reproducible.
fn extract_vendor(text: &str) -> Option<String> {
    let mut cleaned = text.to_string();
    for rule in NOISE_RULES.iter() {
        cleaned = rule.replace_all(&cleaned, " ").into_owned();
    }
    let cleaned = NON_WORD.replace_all(&cleaned, " ");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");

    let mut best: Option<&str> = None;
    for token in cleaned.trim().split(' ') {
        let len = token.chars().count();
        if len < 2 {
            continue;
        }
        if best.map_or(true, |b| len > b.chars().count()) {
            best = Some(token);
        }
    }
    best.map(str::to_string)
}
