//! fxcore - run the effects offline or live in the terminal
//!
//! Run with: cargo run -- live delay --source pluck

mod app;
mod effects;
mod preset;
mod render;
mod source;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use effects::EffectKind;
use source::SourceKind;

#[derive(Parser)]
#[command(name = "fxcore")]
#[command(about = "Delay, EQ, width and dynamics effects", long_about = None)]
struct Cli {
    /// Log preparation details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an effect's parameters
    Params {
        effect: EffectKind,
    },
    /// Process a WAV file
    Render {
        effect: EffectKind,
        /// Input WAV file (mono or stereo)
        input: PathBuf,
        /// Output WAV file (32-bit float)
        output: PathBuf,
        /// TOML preset with a [params] table
        #[arg(short, long)]
        preset: Option<PathBuf>,
        /// Samples per processing block
        #[arg(short, long, default_value = "512")]
        block_size: usize,
    },
    /// Play a test signal through an effect on the default output device
    Live {
        effect: EffectKind,
        #[arg(short, long, value_enum, default_value = "pluck")]
        source: SourceKind,
        /// TOML preset with a [params] table
        #[arg(short, long)]
        preset: Option<PathBuf>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Params { effect } => {
            print_params(effect);
            Ok(())
        }
        Commands::Render {
            effect,
            input,
            output,
            preset,
            block_size,
        } => render::run(effect, &input, &output, preset.as_deref(), block_size),
        Commands::Live {
            effect,
            source,
            preset,
        } => app::run(effect, source, preset.as_deref()),
    }
}

fn print_params(kind: EffectKind) {
    let effect = kind.build();
    let params = effect.params();

    println!("=== {} ===", effect.name());
    println!(
        "{:<14} {:<20} {:>10} {:>10} {:>10}",
        "id", "name", "min", "max", "default"
    );
    for spec in params.specs() {
        println!(
            "{:<14} {:<20} {:>10} {:>10} {:>10}",
            spec.id,
            spec.name,
            spec.format(spec.min),
            spec.format(spec.max),
            spec.format(spec.default)
        );
    }
}
