//! Binary entry point: a click-to-walk scene with a house that rises when the
//! actor reaches the spot.
use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use stroll::{
    init_logging, ModelPlugin, OverwriteMode, PointerInputPlugin, PresentationPlugin,
    StrollConfig, StrollPlugin,
};

/// Walk a character around by clicking the floor
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file overriding the default settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Let overlapping tweens on one property run side by side instead of
    /// replacing each other
    #[arg(long)]
    overlap_tweens: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => StrollConfig::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => StrollConfig::default(),
    };
    if args.overlap_tweens {
        config.tween.overwrite = OverwriteMode::Overlap;
    }

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .build()
            .disable::<LogPlugin>()
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "stroll".to_owned(),
                    ..default()
                }),
                ..default()
            }),
    );
    config.apply(&mut app);
    app.add_plugins((StrollPlugin, PresentationPlugin, ModelPlugin, PointerInputPlugin));
    app.run();
    Ok(())
}
