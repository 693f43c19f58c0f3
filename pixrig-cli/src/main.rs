use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pixrig_core::config::{self, EditorConfig};
use pixrig_core::render::Texture;
use pixrig_core::rig::RigDocument;
use pixrig_core::scene::Scene;
use pixrig_core::VERSION;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pixrig", version = VERSION, about = "Rig and deform pixel-art sprites")]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and inspect an editor config YAML
    Inspect { path: PathBuf },
    /// Print world transforms of every bone in a rig, after pose overrides
    Bones { rig: PathBuf },
    /// Bind a sprite to a rig, apply the rig's pose and export the result
    Render {
        #[arg(long)]
        sprite: PathBuf,
        #[arg(long)]
        rig: PathBuf,
        #[arg(long, default_value = "out.png")]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Virtual resolution override
        #[arg(long)]
        resolution: Option<u32>,
        /// Also write the full-size editor frame with the bone overlay
        #[arg(long)]
        preview: Option<PathBuf>,
        /// Also write export metadata as JSON
        #[arg(long)]
        meta: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.cmd {
        Command::Inspect { path } => {
            let cfg = config::load_from_path(&path)?;
            println!("Loaded config: {}", path.display());
            println!("  canvas: {}x{}", cfg.canvas.width, cfg.canvas.height);
            println!("  mesh grid: {}x{} cells", cfg.mesh.cols, cfg.mesh.rows);
            println!("  virtual resolution: {}", cfg.resolution);
            println!("  pick radius: {:.1}px, start tool: {:?}", cfg.pick_radius, cfg.tool);
        }
        Command::Bones { rig } => {
            let doc = RigDocument::from_path(&rig).with_context(|| format!("reading {}", rig.display()))?;
            let (mut skeleton, ids) = doc.build()?;
            doc.apply_pose(&mut skeleton, &ids)?;
            for (id, wt) in skeleton.world_transforms() {
                let Some(bone) = skeleton.bone(id) else { continue };
                let tip = skeleton.end_point(id);
                println!(
                    "{} {:<12} pos=({:.2}, {:.2}) rot={:.2}° tip=({:.2}, {:.2})",
                    id,
                    bone.name,
                    wt.position.x,
                    wt.position.y,
                    wt.rotation.to_degrees(),
                    tip.x,
                    tip.y
                );
            }
        }
        Command::Render { sprite, rig, out, config: config_path, resolution, preview, meta } => {
            let mut cfg = match config_path {
                Some(path) => config::load_from_path(&path)?,
                None => EditorConfig::default(),
            };
            if let Some(r) = resolution {
                cfg.resolution = r;
            }

            let img = image::open(&sprite).with_context(|| format!("loading {}", sprite.display()))?.to_rgba8();
            let (w, h) = img.dimensions();
            let texture = Texture::from_rgba8(w, h, img.into_raw())
                .ok_or_else(|| anyhow!("Failed to wrap {}x{} sprite", w, h))?;

            let doc = RigDocument::from_path(&rig).with_context(|| format!("reading {}", rig.display()))?;
            let (skeleton, ids) = doc.build()?;

            let mut scene = Scene::new(cfg);
            scene.load_sprite(texture);
            scene.set_skeleton(skeleton);
            scene.bind()?;
            doc.apply_pose(scene.skeleton_mut(), &ids)?;
            log::info!("posed {} bone(s) from {}", doc.pose.len(), rig.display());

            let frame = scene.export()?;
            let (fw, fh) = (frame.width, frame.height);
            let img = image::RgbaImage::from_raw(fw, fh, frame.into_raw())
                .ok_or_else(|| anyhow!("Failed to create image from raw"))?;
            img.save(&out)?;
            println!("Wrote {}x{} image to {}", fw, fh, out.display());

            if let Some(path) = preview {
                let view = scene.render_frame().clone();
                let img = image::RgbaImage::from_raw(view.width, view.height, view.into_raw())
                    .ok_or_else(|| anyhow!("Failed to create preview image"))?;
                img.save(&path)?;
                println!("Wrote preview to {}", path.display());
            }
            if let Some(path) = meta {
                std::fs::write(&path, serde_json::to_string_pretty(&scene.export_meta())?)?;
                println!("Wrote metadata to {}", path.display());
            }
        }
    }
    Ok(())
}
