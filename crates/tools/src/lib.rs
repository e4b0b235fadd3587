//! Headless helpers behind the `lumen` binary.

use foundation::gen_random_numbers;
use gpu::RevealSession;
use gpu::cpu::CpuRevealSurface;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use runtime::{ManualScheduler, Mount, NOMINAL_DT_S};
use scene::SurfaceSize;
use scene::globe::{arcs_from_json, build_points};
use scene::reveal::{RevealConfig, RevealState};
use tracing::info;

pub type ToolError = Box<dyn std::error::Error>;

/// Marker points for an arc list, as pretty JSON.
pub fn points_json(arcs_json: &str, point_size: f64) -> Result<String, ToolError> {
    let arcs = arcs_from_json(arcs_json)?;
    let points = build_points(&arcs, point_size)?;
    info!(arcs = arcs.len(), points = points.len(), "points built");
    Ok(serde_json::to_string_pretty(&points)?)
}

/// `count` distinct integers from `[min, max)`; seeded runs are reproducible.
pub fn sample(min: i64, max: i64, count: usize, seed: Option<u64>) -> Result<Vec<i64>, ToolError> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    Ok(gen_random_numbers(&mut rng, min, max, count)?)
}

/// Reveal config from an optional JSON document; `no_gradient` switches the
/// bottom overlay off whatever the document says.
pub fn reveal_config(
    config_json: Option<&str>,
    no_gradient: bool,
) -> Result<RevealConfig, ToolError> {
    let mut cfg = match config_json {
        Some(json) => RevealConfig::from_json(json)?,
        None => RevealConfig::default(),
    };
    if no_gradient {
        cfg.show_gradient = false;
    }
    Ok(cfg)
}

/// Runs the reveal effect for `frames` frames on the CPU and returns the last
/// one as packed RGB8, top row first.
pub fn render_reveal(
    config: RevealConfig,
    size: SurfaceSize,
    frames: usize,
) -> Result<Vec<u8>, ToolError> {
    let gradient = config.show_gradient;
    let state = RevealState::new(config, size)?;
    let surface = CpuRevealSurface::new(size).with_gradient(gradient);

    let sched = ManualScheduler::new(NOMINAL_DT_S);
    let mount = Mount::start("reveal", sched.clone(), RevealSession::new(state, surface));
    sched.tick_n(frames.max(1));

    let rgb = mount.with_session(|s| s.surface().map(CpuRevealSurface::to_rgb8));
    let time = mount.with_session(|s| s.state().uniforms.time);
    mount.unmount();
    info!(frames, time, width = size.width, height = size.height, "reveal rendered");
    rgb.ok_or_else(|| "reveal surface released before readback".into())
}
