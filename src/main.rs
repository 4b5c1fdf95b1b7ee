use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use snake_autopilot::ai::PilotKind;
use snake_autopilot::game::GameConfig;
use snake_autopilot::modes::AutopilotMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_autopilot")]
#[command(version, about = "Snake that plays itself with path search and lookahead")]
struct Cli {
    /// JSON game config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid height
    #[arg(long)]
    rows: Option<usize>,

    /// Grid width
    #[arg(long)]
    cols: Option<usize>,

    /// Number of games to play
    #[arg(long, default_value = "1")]
    games: usize,

    /// Which pilot drives the snake
    #[arg(long, value_enum)]
    pilot: Option<PilotKind>,

    /// Seed for food placement and pilot randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Write the run summary to this JSON file
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(pilot) = self.pilot {
            config.pilot = pilot;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snake_autopilot=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.game_config()?;

    let mut autopilot = AutopilotMode::new(config)?;
    let summary = autopilot.run(cli.games)?;

    if let Some(path) = &cli.report {
        summary.write_json(path)?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(())
}
