use std::process::ExitCode;

use clap::Parser;
use nightsky_app::frame_loop::FrameLoop;
use nightsky_app::platform::{PlatformDirs, PlatformError};
use nightsky_app::settings::Settings;
use nightsky_config::{CliArgs, ConfigError};
use nightsky_render::{Camera, HeadlessScene, TextureError, Viewport};
use nightsky_space::{Animate, NightSky};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to write sprite texture: {0}")]
    Texture(#[from] TextureError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("nightsky: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(config_dir) => PlatformDirs::resolve_with_root(config_dir),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut settings = Settings::load(&dirs.config_dir, args)?;
    nightsky_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&settings.config),
    );
    info!("Config directory: {}", dirs.config_dir.display());
    if let Some(e) = &settings.fallback {
        warn!("Failed to load config: {e}, using defaults");
    }

    let config = settings.config.clone();
    let mut scene = HeadlessScene::new(config.camera.background_color);
    let mut camera = Camera::from_config(&config.camera, &config.window);
    let mut viewport = Viewport::new(config.window.width, config.window.height);
    info!(
        "{}: {}x{} viewport, fov {} degrees",
        config.window.title, viewport.width, viewport.height, config.camera.fov_degrees
    );

    let mut sky = NightSky::new(&config, &mut scene)?;

    if let Some(path) = &args.dump_texture {
        sky.sprite().save_png(path)?;
        info!("Sprite texture written to {}", path.display());
    }

    let stats_interval = config.debug.stats_interval;
    let reload_interval = config.debug.reload_interval;
    let mut frame_loop = FrameLoop::new(
        config.simulation.target_fps,
        config.simulation.frame_limit,
    );
    frame_loop.run(|frame| {
        sky.animate(&mut scene);
        let render = scene.render(&camera);
        if reload_interval > 0 && (frame + 1) % reload_interval == 0 {
            match settings.reload(&dirs.config_dir, args) {
                Ok(true) => {
                    if settings.apply_window(&mut viewport, &mut camera) {
                        info!("Viewport resized to {}x{}", viewport.width, viewport.height);
                    }
                }
                Ok(false) => {}
                Err(e) => warn!("Ignoring config change: {e}"),
            }
        }
        if stats_interval > 0 && (frame + 1) % stats_interval == 0 {
            let stats = sky.stats();
            info!(
                "Frame {}: {} objects, {}/{} points in view, {} shooting stars live",
                stats.frame,
                render.objects,
                render.points_in_view,
                render.points,
                stats.live_shooting_stars
            );
        }
    });

    let stats = sky.stats();
    info!(
        "Ran {} frames (avg {:.2}ms, {} over budget, {} slow); {} shooting stars spawned, {} expired",
        frame_loop.frame_count(),
        frame_loop.average_frame_time().as_secs_f64() * 1000.0,
        frame_loop.overruns(),
        frame_loop.slow_frames(),
        stats.shooting_stars_spawned,
        stats.shooting_stars_expired
    );

    sky.teardown(&mut scene);
    info!(
        "Scene released {} objects, {} still live",
        scene.released_objects(),
        scene.live_objects()
    );
    Ok(())
}
