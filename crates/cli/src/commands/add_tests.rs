// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{output, TestContext};
use crate::error::{Error, ErrorKind};
use cb_core::Transaction;

fn input(driver: u32, total: &str, received: &str) -> NewTransaction {
    NewTransaction::new(driver, total.parse().unwrap(), received.parse().unwrap())
}

#[tokio::test]
async fn test_add_online_is_confirmed() {
    let ctx = TestContext::online().await;
    let mut buf = Vec::new();
    run_impl(&ctx.session, input(2, "12.50", "20"), OutputFormat::Text, &mut buf)
        .await
        .unwrap();

    let text = output(buf);
    assert!(text.contains("tx-"));
    assert!(text.contains("7.50"));
    assert!(!text.contains("[pending]"));
    assert_eq!(ctx.pending(), 0);
}

#[tokio::test]
async fn test_add_offline_is_pending() {
    let ctx = TestContext::offline();
    let mut buf = Vec::new();
    run_impl(&ctx.session, input(2, "12.50", "20"), OutputFormat::Text, &mut buf)
        .await
        .unwrap();

    let text = output(buf);
    assert!(text.contains("pending_"));
    assert!(text.contains("[pending]"));
    assert!(text.contains("Saved locally"));
    assert_eq!(ctx.pending(), 1);
}

#[tokio::test]
async fn test_add_json_output() {
    let ctx = TestContext::offline();
    let mut buf = Vec::new();
    run_impl(&ctx.session, input(1, "5", "5"), OutputFormat::Json, &mut buf)
        .await
        .unwrap();

    let tx: Transaction = serde_json::from_str(&output(buf)).unwrap();
    assert!(tx.is_pending);
    assert_eq!(tx.change_amount, "0".parse().unwrap());
}

#[tokio::test]
async fn test_add_invalid_is_rejected() {
    let ctx = TestContext::offline();
    let err = run_impl(&ctx.session, input(1, "-5", "5"), OutputFormat::Text, &mut Vec::new())
        .await
        .unwrap_err();

    match err {
        Error::Transaction(e) => assert_eq!(e.kind(), ErrorKind::Validation),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ctx.pending(), 0);
}
