//! haggle application wiring configuration, runner and state

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::negotiation::{Negotiation, NegotiationRunner};
use crate::report::{recent_activity, Activity, Summary};
use crate::state::{NegotiationCounts, StateStore};
use crate::types::{ItemId, NegotiationId};
use std::time::Duration;
use tokio::time::Instant;

/// Main haggle application
pub struct HaggleApp {
    config: SimulationConfig,
    runner: NegotiationRunner,
}

impl HaggleApp {
    /// Create a new application from a validated configuration
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let runner = NegotiationRunner::new(&config);
        Ok(Self { config, runner })
    }

    pub fn store(&self) -> &StateStore {
        self.runner.store()
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.config.duration()
    }

    /// Reset the state file, open negotiations for the first `items`
    /// catalogue entries and run them until done or out of time
    pub async fn simulate(&mut self, items: usize) -> Result<Summary> {
        self.reset()?;
        let deadline = self.deadline();

        let ids: Vec<ItemId> = self
            .config
            .catalog
            .listings()
            .iter()
            .take(items)
            .map(|l| l.id.clone())
            .collect();

        for item_id in &ids {
            if let Err(e) = self.runner.start(item_id, self.config.buyer.budget) {
                tracing::warn!("Could not open negotiation for item {}: {}", item_id, e);
            }
        }

        let finished = self.runner.run_all(deadline).await?;
        tracing::info!("Simulation finished: {} negotiation(s) closed", finished.len());

        Ok(self.summary())
    }

    /// Register a negotiation for `item_id`; defaults to the configured budget
    pub fn start(&mut self, item_id: &str, budget: Option<u64>) -> Result<NegotiationId> {
        let budget = budget.unwrap_or(self.config.buyer.budget);
        self.runner.start(&ItemId::from(item_id), budget)
    }

    /// Drive every active negotiation until done or out of time
    pub async fn run(&mut self) -> Result<Vec<Negotiation>> {
        let deadline = self.deadline();
        self.runner.run_all(deadline).await
    }

    pub fn status(&self) -> NegotiationCounts {
        self.store().load().counts()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_state(&self.store().load())
    }

    pub fn recent_activity(&self, limit: usize) -> Vec<Activity> {
        recent_activity(&self.store().load(), limit)
    }

    pub fn reset(&self) -> Result<()> {
        self.store().reset()?;
        tracing::info!("Reset negotiations file {}", self.store().path().display());
        Ok(())
    }

    /// Poll the state file every `interval` until the configured duration
    /// elapses, handing each snapshot to `render`
    pub async fn watch<F>(&self, interval: Duration, limit: usize, mut render: F)
    where
        F: FnMut(Duration, &[Activity], &Summary),
    {
        let started = Instant::now();
        let deadline = started + self.config.duration();

        loop {
            let state = self.store().load();
            render(
                started.elapsed(),
                &recent_activity(&state, limit),
                &Summary::from_state(&state),
            );

            if Instant::now() + interval > deadline {
                break;
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(dir: &tempfile::TempDir) -> HaggleApp {
        let config = SimulationConfig {
            state_file: dir.path().join("negotiations.json"),
            round_delay_ms: 0,
            seed: Some(3),
            ..Default::default()
        };
        HaggleApp::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_simulate_default_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        let summary = app.simulate(3).await.unwrap();

        assert!(summary.active.is_empty());
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.deals.len(), 1);
        assert_eq!(summary.deals[0].title, "iPhone 12 Pro");
        let price = summary.deals[0].final_price;
        assert!((420..=442).contains(&price));
    }

    #[tokio::test]
    async fn test_start_then_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        app.start("1", None).unwrap();
        app.start("3", Some(2000)).unwrap();
        assert_eq!(app.status().active, 2);

        let finished = app.run().await.unwrap();

        assert_eq!(finished.len(), 2);
        let status = app.status();
        assert_eq!(status.active, 0);
        assert_eq!(status.completed, 2);
    }

    #[test]
    fn test_run_with_nothing_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        let finished = tokio_test::block_on(app.run()).unwrap();

        assert!(finished.is_empty());
    }

    #[test]
    fn test_start_unknown_item_leaves_state_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        assert!(app.start("missing", None).is_err());
        assert_eq!(app.status(), NegotiationCounts::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            max_rounds: 0,
            ..Default::default()
        };
        assert!(HaggleApp::new(config).is_err());
    }

    #[tokio::test]
    async fn test_watch_renders_until_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.config.duration_secs = 0;
        app.start("1", None).unwrap();

        let mut frames = 0;
        app.watch(Duration::from_millis(10), 5, |_, _, summary| {
            frames += 1;
            assert_eq!(summary.active.len(), 1);
        })
        .await;

        assert_eq!(frames, 1);
    }
}
