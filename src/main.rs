//! Colorway entry point
//!
//! Reads a scene snapshot, builds the level plan and prints it as JSON.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(name = "colorway")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extend an authored level and print the placement plan", long_about = None)]
struct Args {
    /// Scene snapshot (JSON)
    scene: PathBuf,

    /// Level to build; defaults to the scene's own name
    level: Option<String>,

    /// Generation settings (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use colorway::{BuilderSettings, LevelAssembler, SceneSnapshot};

    env_logger::init();
    let args = Args::parse();

    let settings = args
        .settings
        .as_deref()
        .map(BuilderSettings::load)
        .unwrap_or_default();
    let scene = SceneSnapshot::load(&args.scene)?;
    let level_name = args.level.as_deref().unwrap_or(&scene.name);

    let assembler = LevelAssembler::new(settings);
    log::info!(
        "Extra tiles: lvl3={}, lvl4={}",
        assembler.settings().level3_extra_tiles,
        assembler.settings().level4_extra_tiles
    );
    let plan = assembler.build_for_scene(level_name, &scene);
    if plan.is_identity() {
        log::info!("Level '{}' left as authored", level_name);
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; the host embeds the assembler directly
}
