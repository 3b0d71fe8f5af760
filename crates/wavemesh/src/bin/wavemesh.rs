//! # wavemesh
//!
//! Command-line front end: decode an audio file and write a box-field STL.
//!
//! ```bash
//! # Defaults: 8000 points, spacing 10, base 1, gain 100, binary STL
//! wavemesh track.wav
//!
//! # Settings from a file, overridden on the command line
//! wavemesh track.mp3 -o track.stl --config mesh.toml --gain 60 --preview
//! ```
//!
//! Set `RUST_LOG=debug` for per-stage detail.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wavemesh::audio::WaveformPreview;
use wavemesh::{convert_signal, load_signal, MeshConfig, StlFormat, DEFAULT_OUTPUT};

/// Sparkline width for `--preview`.
const PREVIEW_WIDTH: usize = 72;

#[derive(Parser)]
#[command(name = "wavemesh", version)]
#[command(about = "Turn an audio waveform into a 3D-printable STL")]
struct Cli {
    /// Path to audio file (WAV or MP3)
    audio: PathBuf,

    /// Output STL path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TOML file with mesh settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of points to resample to
    #[arg(long)]
    points: Option<usize>,

    /// Grid pitch and box footprint
    #[arg(long)]
    spacing: Option<f32>,

    /// Box height at zero amplitude
    #[arg(long, allow_negative_numbers = true)]
    base_height: Option<f32>,

    /// Height added per unit of amplitude
    #[arg(long, allow_negative_numbers = true)]
    gain: Option<f32>,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Print a waveform sparkline before meshing
    #[arg(long)]
    preview: bool,
}

impl Cli {
    /// File settings (or defaults) with command-line overrides applied.
    fn mesh_config(&self) -> Result<MeshConfig> {
        let mut config = match &self.config {
            Some(path) => MeshConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MeshConfig::default(),
        };

        if let Some(points) = self.points {
            config.target_point_count = points;
        }
        if let Some(spacing) = self.spacing {
            config.unit_spacing = spacing;
        }
        if let Some(base_height) = self.base_height {
            config.base_height = base_height;
        }
        if let Some(gain) = self.gain {
            config.height_gain = gain;
        }
        if self.ascii {
            config.output_format = StlFormat::Ascii;
        }

        config.validate().context("Invalid mesh settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.mesh_config()?;

    eprintln!("Loading audio: {}", cli.audio.display());
    let signal = load_signal(&cli.audio)
        .with_context(|| format!("Failed to load audio {}", cli.audio.display()))?;

    if cli.preview {
        if let Some(preview) = WaveformPreview::from_signal(&signal, PREVIEW_WIDTH) {
            println!("{preview}");
            println!();
        }
    }

    eprintln!(
        "Meshing {} samples into ~{} boxes...",
        signal.len(),
        config.target_point_count
    );
    let report = convert_signal(&signal, &cli.output, &config)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("{report}");
    Ok(())
}
