//! End-to-end pipeline run against a live relay.
//!
//! Requires the `nak` binary (available at `/run/current-system/sw/bin/nak`).
//! Run with: `cargo test -- --ignored pipeline_against_live_relay`

use pipe_core::*;
use pipe_relay::nostr_sdk::prelude::{Client, EventBuilder, Keys, Kind, Tag as SdkTag};
use pipe_relay::{KeysSigner, NaddrEncoder, RelayClient};
use std::time::Duration;

const NAK_BIN: &str = "/run/current-system/sw/bin/nak";
const RELAY_PORT: u16 = 19848;
const RELAY_URL: &str = "ws://127.0.0.1:19848";

/// Start `nak serve` as a background process, returning the child handle.
fn start_nak_relay() -> std::process::Child {
    std::process::Command::new(NAK_BIN)
        .args(["serve", "--port", &RELAY_PORT.to_string(), "--quiet"])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .spawn()
        .expect("Failed to start nak serve, is nak installed?")
}

/// Wait for the relay to accept TCP connections.
async fn wait_for_relay() {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(format!("127.0.0.1:{RELAY_PORT}"))
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("Relay did not start within 5 seconds");
}

async fn seed_articles(keys: &Keys) -> Client {
    let client = Client::new(keys.clone());
    client.add_relay(RELAY_URL).await.expect("add relay");
    client.connect().await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let articles = [("Intro", &["go", "rust"][..]), ("Outro", &["go"][..])];
    for (title, hashtags) in articles {
        let mut tags = vec![
            SdkTag::parse(["d", title]).unwrap(),
            SdkTag::parse(["title", title]).unwrap(),
        ];
        tags.extend(hashtags.iter().map(|t| SdkTag::parse(["t", *t]).unwrap()));
        client
            .send_event_builder(EventBuilder::new(Kind::from(KIND_ARTICLE), title).tags(tags))
            .await
            .expect("Failed to seed article");
    }
    client
}

#[tokio::test]
#[ignore] // requires nak binary
async fn pipeline_against_live_relay() {
    // --- Setup ---
    let mut nak = start_nak_relay();
    wait_for_relay().await;

    let author = Keys::generate();
    let seeder = seed_articles(&author).await;

    let relay = RelayClient::connect(RELAY_URL, Duration::from_secs(5))
        .await
        .expect("Failed to connect relay client");

    let ctx = PipelineContext::new(relay.clone()).with_timeout(Duration::from_secs(5));
    let query = || {
        Pipeline::new(&ctx)
            .authors([author.public_key().to_hex()])
            .unwrap()
            .kinds([KIND_ARTICLE])
            .unwrap()
    };

    // --- Tag aggregation ---
    let sorted = query()
        .query()
        .await
        .expect("query failed")
        .tags(TAG_HASHTAG)
        .unwrap()
        .sort_by_count()
        .into_inner();
    assert_eq!(sorted, vec![SortedEntry::new("rust", 1), SortedEntry::new("go", 2)]);

    // --- Titles and addresses ---
    let mut titles = query().query().await.unwrap().titles().unwrap().into_inner();
    titles.sort();
    assert_eq!(titles, vec!["Intro", "Outro"]);

    let addresses = query()
        .query()
        .await
        .unwrap()
        .identifiers(&NaddrEncoder::new())
        .unwrap()
        .into_inner();
    assert_eq!(addresses.len(), 2);
    assert!(addresses.iter().all(|a| a.starts_with("naddr1")));

    // --- Republish under a new key ---
    let republisher = Keys::generate();
    let publisher = Publisher::new(relay.clone(), KeysSigner::new(republisher.clone()));
    let report = query()
        .query()
        .await
        .unwrap()
        .publish(&publisher)
        .await
        .expect("republish failed");
    assert_eq!(report.len(), 2);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let copies = Pipeline::new(&ctx)
        .authors([republisher.public_key().to_hex()])
        .unwrap()
        .query()
        .await
        .unwrap()
        .into_inner()
        .to_events()
        .unwrap();
    assert_eq!(copies.len(), 2);
    assert!(copies.iter().all(|e| e.pubkey == republisher.public_key().to_hex()));

    // --- Cleanup ---
    seeder.disconnect().await;
    nak.kill().expect("Failed to kill nak");
    let _ = nak.wait();
}
