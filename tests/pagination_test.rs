//! Integration tests for carousel pagination.

mod common;

use std::time::Duration;

use common::{post_page, RecordingPause, ScriptedBrowser};
use profile_post_archiver::browser::{BrowserDriver, WaitPolicy};
use profile_post_archiver::extract::SelectorSet;
use profile_post_archiver::pagination::{paginate, PaginationSettings};

const POST_URL: &str = "https://www.picuki.com/media/1";

fn settings() -> PaginationSettings {
    PaginationSettings {
        max_iterations: 10,
        settle_delay: Duration::from_millis(750),
    }
}

async fn open(renders: Vec<String>) -> ScriptedBrowser {
    let mut browser = ScriptedBrowser::new().with_page(POST_URL, renders);
    browser
        .navigate(POST_URL, WaitPolicy::DomContentLoaded, Duration::from_secs(1))
        .await
        .unwrap();
    browser
}

#[tokio::test]
async fn test_carousel_urls_are_merged_in_first_seen_order() {
    let mut browser = open(vec![
        post_page("Caption", "2023-08-21", &["A", "B"], true),
        post_page("Caption", "2023-08-21", &["B", "C"], false),
    ])
    .await;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(contents.media_urls, vec!["A", "B", "C"]);
    assert_eq!(contents.content_text, "Caption");
    assert_eq!(contents.timestamp_raw, "2023-08-21");
    assert_eq!(browser.snapshots, 2);
    assert_eq!(browser.clicks.len(), 1);
}

#[tokio::test]
async fn test_repeated_urls_appear_once() {
    let mut browser = open(vec![
        post_page("", "", &["A", "B"], true),
        post_page("", "", &["A", "B"], true),
        post_page("", "", &["B", "A", "C"], true),
        post_page("", "", &["C", "D", "A"], false),
    ])
    .await;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(contents.media_urls, vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_single_image_post_takes_one_snapshot() {
    let mut browser = open(vec![post_page("Solo", "", &["A"], false)]).await;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(contents.media_urls, vec!["A"]);
    assert_eq!(browser.snapshots, 1);
    assert!(browser.clicks.is_empty());
    assert!(pause.recorded().is_empty());
}

#[tokio::test]
async fn test_never_ending_carousel_stops_at_cap() {
    let mut browser = open(vec![post_page("Loop", "", &["A"], true)]).await;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(browser.snapshots, 10);
    assert_eq!(browser.clicks.len(), 10);
    assert_eq!(pause.recorded().len(), 10);
    assert_eq!(contents.media_urls, vec!["A"]);
}

#[tokio::test]
async fn test_settle_delay_precedes_every_click() {
    let mut browser = open(vec![
        post_page("", "", &["A"], true),
        post_page("", "", &["B"], true),
        post_page("", "", &["C"], false),
    ])
    .await;
    let pause = RecordingPause::default();

    paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(
        pause.recorded(),
        vec![Duration::from_millis(750), Duration::from_millis(750)]
    );
    assert_eq!(browser.clicks, vec![SelectorSet::default().next; 2]);
}

#[tokio::test]
async fn test_each_click_waits_for_navigation_within_settle_delay() {
    let mut browser = open(vec![
        post_page("", "", &["A"], true),
        post_page("", "", &["B"], true),
        post_page("", "", &["C"], false),
    ])
    .await;
    let pause = RecordingPause::default();

    paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(browser.clicks.len(), 2);
    assert_eq!(
        browser.navigation_waits,
        vec![Duration::from_millis(750), Duration::from_millis(750)]
    );
}

#[tokio::test]
async fn test_failed_navigation_wait_keeps_paginating() {
    let mut browser = open(vec![
        post_page("", "", &["A"], true),
        post_page("", "", &["B"], false),
    ])
    .await;
    browser.fail_navigation_waits = true;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(contents.media_urls, vec!["A", "B"]);
    assert_eq!(browser.navigation_waits.len(), 1);
}

#[tokio::test]
async fn test_late_caption_is_picked_up() {
    let mut browser = open(vec![
        post_page("", "", &["A"], true),
        post_page("Settled caption", "3 days ago", &["B"], false),
    ])
    .await;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(contents.content_text, "Settled caption");
    assert_eq!(contents.timestamp_raw, "3 days ago");
}

#[tokio::test]
async fn test_failed_click_keeps_collected_media() {
    let mut browser = open(vec![
        post_page("Caption", "", &["A", "B"], true),
        post_page("Caption", "", &["C"], false),
    ])
    .await;
    browser.fail_clicks = true;
    let pause = RecordingPause::default();

    let contents = paginate(&mut browser, &pause, &SelectorSet::default(), &settings())
        .await
        .unwrap();

    assert_eq!(contents.media_urls, vec!["A", "B"]);
    assert_eq!(browser.clicks.len(), 1);
    assert!(browser.navigation_waits.is_empty());
}

#[tokio::test]
async fn test_unreadable_page_is_an_error() {
    let mut browser = ScriptedBrowser::new();
    let pause = RecordingPause::default();

    let result = paginate(&mut browser, &pause, &SelectorSet::default(), &settings()).await;

    assert!(result.is_err());
}
