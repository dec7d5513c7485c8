use chrono::{Datelike, Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::error::{FintrackError, Result};
use crate::fmt::won;
use crate::settings::db_path;
use crate::store::TransactionStore;

pub fn run(month: Option<&str>) -> Result<()> {
    let (year, month) = match month {
        Some(m) => parse_month(m)
            .ok_or_else(|| FintrackError::Other(format!("invalid month (want YYYY-MM): {m}")))?,
        None => {
            let now = Local::now();
            (now.year(), now.month())
        }
    };

    let from = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| FintrackError::Other(format!("invalid month: {year}-{month:02}")))?;
    let to = next_month(from) - chrono::Duration::days(1);
    let from_s = format!("{}T00:00:00", from.format("%Y-%m-%d"));
    let to_s = format!("{}T23:59:59", to.format("%Y-%m-%d"));

    let store = TransactionStore::open(&db_path())?;
    let records = store.by_date_range(&from_s, &to_s)?;

    if records.is_empty() {
        println!("No transactions in {year}-{month:02}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Date", "Vendor", "Amount", "Bank", "Category", "Synced"]);
    for rec in &records {
        let date = rec.transaction_date.replace('T', " ");
        table.add_row([
            Cell::new(&date),
            Cell::new(&rec.vendor),
            Cell::new(won(rec.amount)),
            Cell::new(&rec.bank),
            Cell::new(rec.category.as_deref().unwrap_or("—")),
            Cell::new(if rec.synced { "✓" } else { "" }),
        ]);
    }
    println!("{table}");

    let total = store.sum_by_date_range(&from_s, &to_s)?;
    println!("{} transaction(s), total {}", records.len(), won(total));
    Ok(())
}

fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (y, m) = raw.split_once('-')?;
    Some((y.parse().ok()?, m.parse().ok()?))
}

fn next_month(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap_or(date)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap_or(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-02"), Some((2026, 2)));
        assert_eq!(parse_month("2026"), None);
        assert_eq!(parse_month("abcd-ef"), None);
    }

    #[test]
    fn test_next_month_rolls_over_year() {
        let dec = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(next_month(dec), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }
}
