// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use yare::parameterized;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn tx(driver_id: u32, day: u32) -> Transaction {
    Transaction {
        id: None,
        driver_id,
        order_total: Decimal::ONE,
        amount_received: Decimal::ONE,
        change_amount: Decimal::ZERO,
        date: date(day),
        timestamp: 0,
        is_pending: false,
    }
}

#[test]
fn all_matches_everything() {
    let filter = TransactionFilter::all();
    assert!(filter.is_unfiltered());
    assert!(filter.matches(&tx(1, 1)));
    assert!(filter.matches(&tx(6, 31)));
}

#[parameterized(
    before = { 9, false },
    same_day = { 10, true },
    after = { 11, false },
)]
fn on_date(day: u32, expected: bool) {
    assert_eq!(TransactionFilter::on_date(date(10)).matches(&tx(1, day)), expected);
}

#[parameterized(
    below = { 4, false },
    lower_bound = { 5, true },
    inside = { 7, true },
    upper_bound = { 9, true },
    above = { 10, false },
)]
fn between_is_inclusive(day: u32, expected: bool) {
    assert_eq!(TransactionFilter::between(date(5), date(9)).matches(&tx(1, day)), expected);
}

#[test]
fn driver_filter() {
    let filter = TransactionFilter::for_driver(3);
    assert!(filter.matches(&tx(3, 1)));
    assert!(!filter.matches(&tx(4, 1)));
}

#[test]
fn combined_filter() {
    let filter = TransactionFilter::on_date(date(10)).with_driver(2);
    assert!(!filter.is_unfiltered());
    assert!(filter.matches(&tx(2, 10)));
    assert!(!filter.matches(&tx(2, 11)));
    assert!(!filter.matches(&tx(1, 10)));
}
