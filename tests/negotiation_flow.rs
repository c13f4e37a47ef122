//! End-to-end negotiation flow, checked through the raw state file the way an
//! external marketplace observer would read it

use haggle::cli::HaggleApp;
use haggle::{Listing, NegotiationRunner, NegotiationStatus, SimulationConfig};
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

fn config(dir: &tempfile::TempDir) -> SimulationConfig {
    SimulationConfig {
        state_file: dir.path().join("negotiations.json"),
        round_delay_ms: 0,
        seed: Some(11),
        ..Default::default()
    }
}

fn read_raw(config: &SimulationConfig) -> Value {
    let content = std::fs::read_to_string(&config.state_file).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_agreement_is_listed_as_completed() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let mut runner = NegotiationRunner::new(&config);

    let listing = Listing::new("42", "Record Player", "Electronics", 120, 80);
    let id = runner.register(&listing, 100).unwrap();

    let raw = read_raw(&config);
    assert_eq!(raw["active_negotiations"][&id.0]["status"], "active");
    assert_eq!(raw["agent_status"]["buyer_agent"], "negotiating");

    let deadline = Instant::now() + Duration::from_secs(30);
    let negotiation = runner.run(&id, deadline).await.unwrap();
    assert_eq!(negotiation.status(), NegotiationStatus::Agreed);
    assert_eq!(negotiation.final_price(), Some(86));

    let raw = read_raw(&config);
    assert!(raw["active_negotiations"].get(&id.0).is_none());

    let completed = raw["completed_negotiations"].as_array().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["id"], id.0.as_str());
    assert_eq!(completed[0]["status"], "agreed");
    assert_eq!(completed[0]["final_price"], 86);
    assert_eq!(completed[0]["history"][0]["from"], "buyer");
    assert_eq!(completed[0]["history"][0]["action"], "open");
    assert_eq!(raw["agent_status"]["seller_agent"], "idle");

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_failure_is_listed_with_reason() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let mut runner = NegotiationRunner::new(&config);

    let listing = Listing::new("43", "Armchair", "Furniture", 300, 200);
    let id = runner.register(&listing, 150).unwrap();

    let deadline = Instant::now() + Duration::from_secs(30);
    let negotiation = runner.run(&id, deadline).await.unwrap();
    assert_eq!(negotiation.status(), NegotiationStatus::Failed);
    assert!(negotiation.round() <= config.max_rounds);

    let raw = read_raw(&config);
    let completed = &raw["completed_negotiations"][0];
    assert_eq!(completed["status"], "failed");
    assert!(completed.get("final_price").is_none());
    let reason = completed["failure_reason"].as_str().unwrap();
    assert!(["round_limit", "stalemate"].contains(&reason));

    let history = completed["history"].as_array().unwrap();
    let closing = history.last().unwrap();
    assert_eq!(closing["from"], "buyer");
    assert_eq!(closing["action"], "end");
    assert_eq!(closing["price"], 150);
}

#[tokio::test]
async fn test_corrupt_state_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    std::fs::write(&config.state_file, "not json at all").unwrap();

    let mut app = HaggleApp::new(config.clone()).unwrap();
    assert_eq!(app.status().active, 0);

    app.start("1", None).unwrap();
    let raw = read_raw(&config);
    assert_eq!(raw["active_negotiations"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_simulation_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = HaggleApp::new(config(&dir)).unwrap();

    let summary = app.simulate(2).await.unwrap();

    assert_eq!(summary.completed, 2);
    assert!(summary.active.is_empty());
    let text = summary.to_string();
    assert!(text.contains("NEGOTIATION SUMMARY"));
    assert!(text.contains("Vintage Leather Sofa"));
}
