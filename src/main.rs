use blockforest::canvas::{paint, PixelSurface};
use blockforest::config::{Rgb, StyleConfig, ViewConfig};
use blockforest::forest::{generate_params, DrawCall, ForestParams};
use blockforest::settings::Settings;
use blockforest::{view, Block, ForestError, Result, Seed};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "blockforest")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Deterministic fractal forests grown from block hashes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the draw calls as JSON
    Segments {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Render the forest to a PNG file
    Png {
        #[command(flatten)]
        source: SourceArgs,

        /// Output path
        #[arg(short, long, default_value = "forest.png")]
        output: PathBuf,
    },

    /// Preview the forest in the terminal
    View {
        #[command(flatten)]
        source: SourceArgs,

        /// Print once to stdout instead of the interactive view
        #[arg(short, long)]
        print: bool,

        /// Branch angle change per key press (radians)
        #[arg(short = 'S', long, default_value = "0.05")]
        step: f64,

        /// Hide the status line
        #[arg(long)]
        no_status: bool,
    },
}

/// Where the seed comes from plus style overrides
#[derive(Args)]
struct SourceArgs {
    /// Block hash (hex, optionally 0x-prefixed)
    #[arg(short = 'H', long, conflicts_with = "block")]
    hash: Option<String>,

    /// JSON file with a block record containing a "hash" field
    #[arg(short, long)]
    block: Option<PathBuf>,

    /// Branch angle in radians
    #[arg(short = 'a', long)]
    mod1: Option<f64>,

    /// Reserved modifier
    #[arg(long)]
    mod2: Option<f64>,

    /// Reserved modifier
    #[arg(long)]
    mod3: Option<f64>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Background color (#rrggbb)
    #[arg(long)]
    background: Option<String>,

    /// Accent color (#rrggbb)
    #[arg(long)]
    color1: Option<String>,
}

impl SourceArgs {
    /// Hash from `--hash` or the block file
    fn hash(&self) -> Result<String> {
        if let Some(hash) = &self.hash {
            return Ok(hash.clone());
        }
        match &self.block {
            Some(path) => {
                let block = Block::from_json(&fs::read_to_string(path)?)?;
                // Validate here so a bad block fails before any other work
                block.seed()?;
                Ok(block.hash.unwrap_or_default())
            }
            None => Err(ForestError::InvalidSeed(String::new())),
        }
    }

    /// Preset, then config file, then flags
    fn style(&self, settings: &Settings) -> Result<StyleConfig> {
        let base = settings.style();
        let style = StyleConfig {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            mod1: self.mod1.unwrap_or(base.mod1),
            mod2: self.mod2.unwrap_or(base.mod2),
            mod3: self.mod3.unwrap_or(base.mod3),
            color1: parse_color(self.color1.as_deref(), base.color1)?,
            background: parse_color(self.background.as_deref(), base.background)?,
        };
        style.validate()?;
        Ok(style)
    }
}

fn parse_color(value: Option<&str>, fallback: Rgb) -> Result<Rgb> {
    value.map_or(Ok(fallback), |s| s.parse())
}

#[derive(Serialize)]
struct SegmentsOutput<'a> {
    seed: String,
    width: u32,
    height: u32,
    branch_angle: f64,
    trees: usize,
    depth: usize,
    draw_calls: &'a [DrawCall],
}

fn params(style: &StyleConfig) -> ForestParams {
    ForestParams::new(style.width, style.height, style.mod1)
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();

    match cli.command {
        Commands::Segments { source, pretty } => {
            let seed = Seed::from_hash(&source.hash()?)?;
            let style = source.style(&settings)?;
            let forest = generate_params(seed, &params(&style));
            let draw_calls: Vec<DrawCall> = forest.draw_calls().collect();

            let output = SegmentsOutput {
                seed: seed.to_string(),
                width: style.width,
                height: style.height,
                branch_angle: style.mod1,
                trees: forest.trees.len(),
                depth: forest.depth,
                draw_calls: &draw_calls,
            };

            let mut stdout = io::stdout().lock();
            if pretty {
                serde_json::to_writer_pretty(&mut stdout, &output)?;
            } else {
                serde_json::to_writer(&mut stdout, &output)?;
            }
            writeln!(stdout)?;
        }
        Commands::Png { source, output } => {
            let seed = Seed::from_hash(&source.hash()?)?;
            let style = source.style(&settings)?;
            let forest = generate_params(seed, &params(&style));
            info!("seed {}: {} segments", seed, forest.segments.len());

            let mut surface = PixelSurface::new(style.width, style.height, style.background);
            paint(&forest, &mut surface);
            surface.save_png(&output)?;
        }
        Commands::View {
            source,
            print,
            step,
            no_status,
        } => {
            let config = ViewConfig {
                hash: source.hash()?,
                style: source.style(&settings)?,
                angle_step: step,
                show_status: !no_status,
            };
            if print {
                view::print(&config)?;
            } else {
                view::run(&config)?;
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("blockforest: {}", e);
            ExitCode::FAILURE
        }
    }
}
