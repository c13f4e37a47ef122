//! haggle CLI binary

use anyhow::Context;
use clap::Parser;
use haggle::cli::{Cli, Commands, HaggleApp};
use haggle::SimulationConfig;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SimulationConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }

    match cli.command {
        Commands::Simulate {
            duration,
            rounds,
            delay_ms,
            budget,
            items,
            seed,
        } => {
            if let Some(duration) = duration {
                config.duration_secs = duration;
            }
            if let Some(rounds) = rounds {
                config.max_rounds = rounds;
            }
            if let Some(delay_ms) = delay_ms {
                config.round_delay_ms = delay_ms;
            }
            if let Some(budget) = budget {
                config.buyer.budget = budget;
            }
            if seed.is_some() {
                config.seed = seed;
            }

            tracing::info!(
                "Starting marketplace negotiation simulation for {}s",
                config.duration_secs
            );
            let mut app = HaggleApp::new(config)?;
            let summary = app.simulate(items).await?;
            println!("{}", summary);
        }

        Commands::Start { item, budget } => {
            let mut app = HaggleApp::new(config)?;
            let id = app
                .start(&item, budget)
                .with_context(|| format!("failed to start negotiation for item {}", item))?;
            println!("{}", id);
        }

        Commands::Run { duration } => {
            if let Some(duration) = duration {
                config.duration_secs = duration;
            }
            let mut app = HaggleApp::new(config)?;
            let finished = app.run().await?;
            tracing::info!("{} negotiation(s) finished", finished.len());
            println!("{}", app.summary());
        }

        Commands::Status => {
            let app = HaggleApp::new(config)?;
            println!("{}", serde_json::to_string_pretty(&app.status())?);
        }

        Commands::Summary => {
            let app = HaggleApp::new(config)?;
            println!("{}", app.summary());
        }

        Commands::Watch {
            duration,
            interval_ms,
            limit,
        } => {
            if let Some(duration) = duration {
                config.duration_secs = duration;
            }
            let total = config.duration_secs;
            let app = HaggleApp::new(config)?;
            app.watch(Duration::from_millis(interval_ms), limit, |elapsed, activity, summary| {
                println!("MARKETPLACE NEGOTIATION MONITOR");
                println!("{}", "=".repeat(50));
                println!("Running time: {}s / {}s", elapsed.as_secs(), total);
                println!("\nRecent Activity:");
                for event in activity {
                    println!("  {}", event);
                }
                println!("\n{}", summary);
            })
            .await;
        }

        Commands::Reset => {
            let app = HaggleApp::new(config)?;
            app.reset()?;
        }
    }

    Ok(())
}
