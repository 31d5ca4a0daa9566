// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use cb_core::TransactionFilter;

/// Date selection shared by `list` and `summary`.
#[derive(Args, Clone, Debug, Default)]
pub struct DateArgs {
    /// Only this day
    #[arg(long, value_parser = parse_date, conflicts_with_all = ["from", "to"])]
    pub date: Option<NaiveDate>,

    /// First day, inclusive
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

impl DateArgs {
    pub fn filter(&self) -> TransactionFilter {
        match self.date {
            Some(day) => TransactionFilter::on_date(day),
            None => TransactionFilter {
                date_from: self.from,
                date_to: self.to,
                driver_id: None,
            },
        }
    }
}

/// Parse a decimal amount such as `12.50`.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| format!("'{}' is not a decimal amount", s))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date (expected YYYY-MM-DD)", s))
}
