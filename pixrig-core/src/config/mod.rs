pub mod schema;

use anyhow::{ensure, Context, Result};
pub use schema::{Canvas, EditorConfig, MeshDensity};

/// Parse and validate an editor config. A zero resolution is accepted and
/// clamped to 1 by the sampler.
pub fn load_from_yaml_str(s: &str) -> Result<EditorConfig> {
    let cfg: EditorConfig = serde_yaml::from_str(s).context("parsing editor config")?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<EditorConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    load_from_yaml_str(&data).with_context(|| format!("in {}", path.display()))
}

pub fn validate(cfg: &EditorConfig) -> Result<()> {
    let Canvas { width, height } = cfg.canvas;
    ensure!(width > 0 && height > 0, "canvas must be non-empty, got {width}x{height}");
    let MeshDensity { cols, rows } = cfg.mesh;
    ensure!(cols > 0 && rows > 0, "mesh grid needs at least one cell, got {cols}x{rows}");
    ensure!(
        cfg.pick_radius.is_finite() && cfg.pick_radius >= 0.0,
        "pick_radius must be a finite distance, got {}",
        cfg.pick_radius
    );
    let r = cfg.overlay.joint_radius_px;
    ensure!(r.is_finite() && r >= 0.0, "overlay.joint_radius_px must be a finite size, got {r}");
    Ok(())
}
