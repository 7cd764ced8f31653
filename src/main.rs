use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use threaded_snake::game::GameConfig;
use threaded_snake::modes::HumanMode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "threaded_snake")]
#[command(version, about = "Snake with a fixed-rate update loop decoupled from rendering")]
struct Cli {
    /// Rule set to play with
    #[arg(long, value_enum, default_value = "arcade")]
    variant: Variant,

    /// Playing area width
    #[arg(long)]
    width: Option<u32>,

    /// Playing area height
    #[arg(long)]
    height: Option<u32>,

    /// Side of one grid cell
    #[arg(long)]
    cell_size: Option<u32>,

    /// Game updates per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Frames drawn per second
    #[arg(long)]
    fps: Option<u32>,

    /// Points per food eaten
    #[arg(long)]
    score_increment: Option<u32>,

    /// Starting snake length
    #[arg(long)]
    initial_length: Option<usize>,

    /// Seed for reproducible food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Exit right after printing the final score
    #[arg(long)]
    no_prompt: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// One life, +1 per food, no pause
    Classic,
    /// Pause and restart, +10 per food, cycling colors
    Arcade,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let mut config = match self.variant {
            Variant::Classic => GameConfig::classic(),
            Variant::Arcade => GameConfig::arcade(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if let Some(increment) = self.score_increment {
            config.score_increment = increment;
        }
        if let Some(length) = self.initial_length {
            config.initial_length = length;
        }
        config.seed = self.seed;
        config.prompt_on_exit &= !self.no_prompt;

        config
    }

    fn farewell(&self, score: u32) -> String {
        match self.variant {
            Variant::Classic => format!("Game Over! Your score: {score}"),
            Variant::Arcade => format!("Thanks for playing! Final score: {score}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr; the game itself draws on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = cli.game_config();
    config.validate().context("Invalid game configuration")?;
    let prompt_on_exit = config.prompt_on_exit;

    let mut human_mode = HumanMode::new(config);
    let exit = match human_mode.run().await {
        Ok(summary) => {
            if let Some(fault) = &summary.fault {
                println!("The game stopped after an internal error: {fault}");
            }
            println!("{}", cli.farewell(summary.score));
            ExitCode::SUCCESS
        }
        // Reported here so it stays on screen while the prompt waits
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    };

    if prompt_on_exit {
        println!("Press Enter to close...");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
    }

    Ok(exit)
}
