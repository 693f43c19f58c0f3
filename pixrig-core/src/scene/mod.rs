//! Per-frame driver tying the rig, the editor, skinning and the rasterizer
//! together.
//!
//! Frame order is fixed: deform (when bound), rasterize through the quantized
//! sampler, then draw the bone overlay from fresh world transforms.

use crate::config::EditorConfig;
use crate::edit::{EditEvent, PoseEditor, Tool};
use crate::error::{Error, Result};
use crate::export::{downsample_nearest, ExportMeta};
use crate::render::{draw_skeleton, generate_grid, rasterize_mesh, Frame, Mesh, PixelSampler, Texture};
use crate::rig::Skeleton;
use crate::skin::{bind, Binding};
use glam::Vec2;

/// Loaded image and the mesh it is drawn with.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture: Texture,
    pub mesh: Mesh,
}

pub struct Scene {
    config: EditorConfig,
    skeleton: Skeleton,
    editor: PoseEditor,
    sprite: Option<Sprite>,
    binding: Option<Binding>,
    sampler: PixelSampler,
    frame: Frame,
}

impl Default for Scene {
    fn default() -> Self { Self::new(EditorConfig::default()) }
}

impl Scene {
    pub fn new(config: EditorConfig) -> Self {
        let mut editor = PoseEditor::new(config.pick_radius);
        editor.set_tool(config.tool);
        Self {
            sampler: PixelSampler::new(config.resolution),
            frame: Frame::new(config.canvas.width, config.canvas.height),
            skeleton: Skeleton::new(),
            sprite: None,
            binding: None,
            editor,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig { &self.config }
    pub fn skeleton(&self) -> &Skeleton { &self.skeleton }
    /// Direct access for the property panel. Edits made here are picked up
    /// by the next frame like any pointer edit.
    pub fn skeleton_mut(&mut self) -> &mut Skeleton { &mut self.skeleton }
    pub fn editor(&self) -> &PoseEditor { &self.editor }
    pub fn sprite(&self) -> Option<&Sprite> { self.sprite.as_ref() }
    pub fn binding(&self) -> Option<&Binding> { self.binding.as_ref() }
    pub fn is_bound(&self) -> bool { self.binding.is_some() }
    pub fn sampler(&self) -> &PixelSampler { &self.sampler }
    pub fn frame(&self) -> &Frame { &self.frame }

    /// Install a new image. A sprite mesh sized to the canvas is generated and
    /// any previous binding and bind pose are discarded.
    pub fn load_sprite(&mut self, texture: Texture) {
        let canvas = self.config.canvas;
        let mesh = generate_grid(canvas.width as f32, canvas.height as f32, self.config.mesh.cols, self.config.mesh.rows);
        if self.binding.take().is_some() {
            log::info!("new sprite loaded; previous binding discarded");
        }
        log::debug!("sprite {}x{} on {} vertex grid", texture.width, texture.height, mesh.vertices.len());
        self.sprite = Some(Sprite { texture, mesh });
    }

    /// Replace the skeleton wholesale, e.g. from a rig document. Drops the
    /// binding since its bone ids no longer mean anything.
    pub fn set_skeleton(&mut self, skeleton: Skeleton) {
        self.unbind();
        self.skeleton = skeleton;
    }

    pub fn bind(&mut self) -> Result<()> {
        if self.binding.is_some() {
            return Ok(());
        }
        let binding = bind(&self.skeleton, self.sprite.as_ref().map(|s| &s.mesh))?;
        self.binding = Some(binding);
        Ok(())
    }

    /// Restore the rest mesh. No-op when not bound.
    pub fn unbind(&mut self) {
        if let Some(binding) = self.binding.take() {
            match self.sprite.as_mut() {
                Some(sprite) => binding.release(&mut sprite.mesh),
                None => log::warn!("binding dropped without a sprite to restore"),
            }
        }
    }

    /// Back to the bind-time pose. No-op without a snapshot.
    pub fn reset_pose(&mut self) {
        if let Some(binding) = &self.binding {
            binding.reset_pose(&mut self.skeleton);
        }
    }

    pub fn set_resolution(&mut self, resolution: u32) {
        self.sampler.set_resolution(resolution);
        self.config.resolution = self.sampler.resolution();
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.editor.set_tool(tool);
        self.config.tool = tool;
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> EditEvent {
        self.editor.pointer_down(&mut self.skeleton, Vec2::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> EditEvent {
        self.editor.pointer_move(&mut self.skeleton, Vec2::new(x, y))
    }

    pub fn pointer_up(&mut self) -> EditEvent { self.editor.pointer_up() }
    pub fn pointer_up_outside(&mut self) -> EditEvent { self.editor.pointer_up_outside() }

    /// Run one frame and return the editor view.
    pub fn render_frame(&mut self) -> &Frame {
        self.deform();
        self.frame.clear(self.config.background_rgba);
        if let Some(sprite) = &self.sprite {
            rasterize_mesh(&mut self.frame, &sprite.mesh, &sprite.texture, &self.sampler);
        }
        draw_skeleton(&mut self.frame, &self.skeleton, &self.config.overlay);
        &self.frame
    }

    /// Render the sprite without overlay at canvas size and point-sample it
    /// down to `R x R`. Requires a loaded sprite and a bound skeleton.
    pub fn export(&mut self) -> Result<Frame> {
        if self.binding.is_none() {
            return Err(Error::ExportNotReady("skeleton is not bound"));
        }
        self.deform();
        let sprite = self.sprite.as_ref().ok_or(Error::ExportNotReady("no sprite loaded"))?;
        let mut offscreen = Frame::new(self.config.canvas.width, self.config.canvas.height);
        offscreen.clear(self.config.background_rgba);
        rasterize_mesh(&mut offscreen, &sprite.mesh, &sprite.texture, &self.sampler);
        let out = downsample_nearest(&offscreen, self.sampler.resolution());
        log::info!("exported {0}x{0} from {1}x{2} canvas", out.width, offscreen.width, offscreen.height);
        Ok(out)
    }

    pub fn export_meta(&self) -> ExportMeta {
        ExportMeta {
            resolution: self.sampler.resolution(),
            canvas: (self.config.canvas.width, self.config.canvas.height),
            bones: self.skeleton.len(),
            bound_vertices: self.binding.as_ref().map_or(0, |b| b.entries().len()),
        }
    }

    fn deform(&mut self) {
        if let (Some(binding), Some(sprite)) = (&self.binding, self.sprite.as_mut()) {
            binding.deform(&self.skeleton, &mut sprite.mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Canvas, MeshDensity};
    use crate::edit::DragMode;
    use std::f32::consts::FRAC_PI_2;

    fn small_config() -> EditorConfig {
        EditorConfig {
            canvas: Canvas { width: 16, height: 16 },
            mesh: MeshDensity { cols: 4, rows: 4 },
            resolution: 4,
            ..EditorConfig::default()
        }
    }

    // 4x4 texture, texel (x, y) colored (x * 60, y * 60, 0).
    fn gradient() -> Texture {
        let mut t = Texture::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                t.set_texel(x, y, [(x * 60) as u8, (y * 60) as u8, 0, 255]);
            }
        }
        t
    }

    #[test]
    fn bind_reports_missing_prerequisites() {
        let mut scene = Scene::new(small_config());
        assert_eq!(scene.bind(), Err(Error::NoMeshLoaded));
        scene.load_sprite(gradient());
        assert_eq!(scene.bind(), Err(Error::EmptySkeleton));
        assert!(!scene.is_bound());
    }

    #[test]
    fn export_requires_sprite_and_binding() {
        let mut scene = Scene::new(small_config());
        assert!(matches!(scene.export(), Err(Error::ExportNotReady(_))));
        scene.load_sprite(gradient());
        scene.set_tool(Tool::AddJoint);
        scene.pointer_down(8.0, 8.0);
        assert!(matches!(scene.export(), Err(Error::ExportNotReady(_))));
        scene.bind().unwrap();
        let out = scene.export().unwrap();
        assert_eq!((out.width, out.height), (4, 4));
        assert_eq!(out.pixel(3, 1), [180, 60, 0, 255]);
    }

    #[test]
    fn posed_export_rotates_whole_virtual_pixels() {
        let mut scene = Scene::new(small_config());
        scene.load_sprite(gradient());
        let root = scene.skeleton_mut().add_bone(None, Vec2::new(8.0, 8.0), 0.0, 0.0).unwrap();
        scene.bind().unwrap();

        scene.skeleton_mut().update_bone(root, crate::rig::BonePatch::new().rotation(FRAC_PI_2));
        let out = scene.export().unwrap();
        // A quarter turn about the center maps source (x, y) to (3 - y, x).
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(3 - y, x), [(x * 60) as u8, (y * 60) as u8, 0, 255], "texel {x},{y}");
            }
        }
    }

    #[test]
    fn frame_deforms_before_drawing_overlay() {
        let mut config = small_config();
        config.overlay.joint_radius_px = 0.0;
        let mut scene = Scene::new(config);
        scene.load_sprite(gradient());
        let root = scene.skeleton_mut().add_bone(None, Vec2::new(0.0, 0.0), 0.0, 0.0).unwrap();
        scene.bind().unwrap();

        // Drag the root joint by (+4, +4) through the editor.
        assert_eq!(scene.pointer_down(0.0, 0.0), EditEvent::DragStarted { bone: root, mode: DragMode::Move });
        scene.pointer_move(4.0, 4.0);
        scene.pointer_up();

        let frame = scene.render_frame();
        // The mesh moved with the bone in the same frame.
        assert_eq!(frame.pixel(2, 2), [0, 0, 0, 0]);
        assert_eq!(frame.pixel(5, 5), [0, 0, 0, 255]);
        assert_eq!(frame.pixel(9, 5), [60, 0, 0, 255]);
    }

    #[test]
    fn unbind_after_bind_restores_mesh() {
        let mut scene = Scene::new(small_config());
        scene.load_sprite(gradient());
        let before = scene.sprite().unwrap().mesh.vertices.clone();
        let root = scene.skeleton_mut().add_bone(None, Vec2::new(3.0, 3.0), 0.0, 0.0).unwrap();
        scene.bind().unwrap();
        scene.skeleton_mut().update_bone(root, crate::rig::BonePatch::new().rotation(1.0));
        scene.render_frame();
        assert_ne!(scene.sprite().unwrap().mesh.vertices, before);

        scene.unbind();
        assert!(!scene.is_bound());
        assert_eq!(scene.sprite().unwrap().mesh.vertices, before);
    }

    #[test]
    fn rotate_then_reset_pose() {
        let mut scene = Scene::new(small_config());
        scene.load_sprite(gradient());
        let root = scene.skeleton_mut().add_bone(None, Vec2::new(2.0, 2.0), 0.0, 4.0).unwrap();
        let child = scene.skeleton_mut().add_bone(Some(root), Vec2::new(4.0, 0.0), 0.25, 4.0).unwrap();
        scene.bind().unwrap();

        // Grab the child's tip and swing it.
        let tip = scene.skeleton().end_point(child);
        assert_eq!(scene.pointer_down(tip.x, tip.y), EditEvent::DragStarted { bone: child, mode: DragMode::Rotate });
        scene.pointer_move(6.0, 12.0);
        scene.pointer_up();
        assert_ne!(scene.skeleton().bone(child).unwrap().rotation, 0.25);

        scene.reset_pose();
        assert_eq!(scene.skeleton().bone(child).unwrap().rotation.to_bits(), 0.25f32.to_bits());
    }

    #[test]
    fn new_sprite_discards_binding() {
        let mut scene = Scene::new(small_config());
        scene.load_sprite(gradient());
        scene.skeleton_mut().add_bone(None, Vec2::ZERO, 0.0, 0.0).unwrap();
        scene.bind().unwrap();
        scene.load_sprite(gradient());
        assert!(!scene.is_bound());
        // Reset without a snapshot does nothing.
        scene.reset_pose();
        assert_eq!(scene.export_meta().bound_vertices, 0);
    }

    #[test]
    fn resolution_changes_at_runtime() {
        let mut scene = Scene::new(small_config());
        scene.load_sprite(gradient());
        scene.skeleton_mut().add_bone(None, Vec2::ZERO, 0.0, 0.0).unwrap();
        scene.bind().unwrap();
        scene.set_resolution(2);
        let out = scene.export().unwrap();
        assert_eq!((out.width, out.height), (2, 2));
        assert_eq!(out.pixel(1, 1), [120, 120, 0, 255]);
        assert_eq!(scene.export_meta().resolution, 2);
    }
}
