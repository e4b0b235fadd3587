use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scene::SurfaceSize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tools::{ToolError, points_json, render_reveal, reveal_config, sample};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tools for the reveal and globe components")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the marker points built from an arc JSON file
    Points {
        /// JSON array of arcs
        arcs: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        point_size: f64,
    },

    /// Print distinct random integers from [min, max)
    Sample {
        min: i64,
        max: i64,
        count: usize,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Render a reveal frame to a PNG
    Reveal {
        #[arg(long, default_value_t = 512)]
        width: u32,

        #[arg(long, default_value_t = 512)]
        height: u32,

        /// Frames to advance before capturing
        #[arg(long, default_value_t = 60)]
        frames: usize,

        /// Optional camelCase config JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the dark bottom gradient
        #[arg(long)]
        no_gradient: bool,

        #[arg(long, default_value = "reveal.png")]
        out: PathBuf,
    },
}

fn main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Args::parse().command {
        Command::Points { arcs, point_size } => {
            let json = fs::read_to_string(&arcs)?;
            println!("{}", points_json(&json, point_size)?);
        }
        Command::Sample {
            min,
            max,
            count,
            seed,
        } => {
            let values = sample(min, max, count, seed)?;
            println!("{}", serde_json::to_string(&values)?);
        }
        Command::Reveal {
            width,
            height,
            frames,
            config,
            no_gradient,
            out,
        } => {
            let json = config.map(fs::read_to_string).transpose()?;
            let cfg = reveal_config(json.as_deref(), no_gradient)?;

            let size = SurfaceSize::from_measured(width as f64, height as f64);
            let rgb = render_reveal(cfg, size, frames)?;
            let img = image::RgbImage::from_raw(size.width, size.height, rgb)
                .ok_or("frame buffer does not match the surface size")?;
            img.save(&out)?;
            info!("wrote {}", out.display());
        }
    }

    Ok(())
}
