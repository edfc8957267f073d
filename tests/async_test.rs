//! Tests for the async entry point.

#![cfg(feature = "async")]

mod common;

use bandfilter::{filter_file_async, Error, FilterMode};

#[tokio::test]
async fn test_filter_file_async() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("schedules.pdf");
    std::fs::write(&input, common::five_page_schedule()).unwrap();

    let outcome = filter_file_async(&input, FilterMode::BandOnly).await.unwrap();
    assert_eq!(outcome.report().tally.kept_page_indices, vec![0, 2]);
}

#[tokio::test]
async fn test_filter_file_async_missing_file() {
    let result = filter_file_async("/nonexistent/schedules.pdf", FilterMode::Both).await;
    assert!(matches!(result, Err(Error::Io(_))));
}
