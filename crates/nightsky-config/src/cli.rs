//! Command-line argument parsing for the night sky viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Night sky command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nightsky", about = "Animated procedural night sky")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Target frame rate (0 = unpaced).
    #[arg(long)]
    pub fps: Option<u32>,

    /// Seed for a reproducible sky.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of regular stars.
    #[arg(long)]
    pub star_count: Option<u32>,

    /// Number of nebula blobs.
    #[arg(long)]
    pub nebula_count: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the nebula particle sprite to this PNG file.
    #[arg(long)]
    pub dump_texture: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(frames) = args.frames {
            self.simulation.frame_limit = Some(frames);
        }
        if let Some(fps) = args.fps {
            self.simulation.target_fps = fps;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(count) = args.star_count {
            self.stars.count = count;
        }
        if let Some(count) = args.nebula_count {
            self.nebula.count = count;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
