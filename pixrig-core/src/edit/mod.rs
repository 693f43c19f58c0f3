//! Pointer-driven pose editing.
//!
//! [`PoseEditor`] turns pointer events into skeleton mutations according to
//! the active [`Tool`]. Every handler runs synchronously between frames, so a
//! mutation is fully applied before the next deformation pass reads the pose.

mod pick;

pub use pick::{find_closest_bone, AnchorPoint, Pick, DEFAULT_PICK_RADIUS};

use crate::geometry::{angle_between, angle_delta, distance};
use crate::rig::{BoneId, BonePatch, Skeleton};
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    AddJoint,
    AddBone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Move,
}

/// In-flight gesture. Only lives between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Drag {
    #[default]
    Idle,
    /// Incremental rotation: `last_angle` is the pointer angle seen on the
    /// previous move, measured from the bone's world origin.
    Rotating { bone: BoneId, last_angle: f32 },
    /// Root translation, delta-tracked from the pointer-down position.
    Moving { bone: BoneId, pointer_anchor: Vec2, start_position: Vec2 },
}

impl Drag {
    pub fn bone(&self) -> Option<BoneId> {
        match *self {
            Drag::Idle => None,
            Drag::Rotating { bone, .. } | Drag::Moving { bone, .. } => Some(bone),
        }
    }

    pub fn mode(&self) -> Option<DragMode> {
        match self {
            Drag::Idle => None,
            Drag::Rotating { .. } => Some(DragMode::Rotate),
            Drag::Moving { .. } => Some(DragMode::Move),
        }
    }
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditEvent {
    Nothing,
    Created(BoneId),
    AnchorSet { bone: BoneId, point: AnchorPoint },
    DragStarted { bone: BoneId, mode: DragMode },
    Dragged(BoneId),
    DragEnded(BoneId),
    SelectionCleared,
}

#[derive(Debug, Clone)]
pub struct PoseEditor {
    tool: Tool,
    pick_radius: f32,
    pending: Option<(BoneId, AnchorPoint)>,
    drag: Drag,
}

impl Default for PoseEditor {
    fn default() -> Self { Self::new(DEFAULT_PICK_RADIUS) }
}

impl PoseEditor {
    pub fn new(pick_radius: f32) -> Self {
        Self { tool: Tool::Select, pick_radius, pending: None, drag: Drag::Idle }
    }

    pub fn tool(&self) -> Tool { self.tool }
    pub fn drag(&self) -> Drag { self.drag }
    pub fn pending_anchor(&self) -> Option<(BoneId, AnchorPoint)> { self.pending }
    pub fn pick_radius(&self) -> f32 { self.pick_radius }

    /// Switching tools abandons any half-finished gesture.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.pending = None;
        self.drag = Drag::Idle;
    }

    pub fn pointer_down(&mut self, skeleton: &mut Skeleton, p: Vec2) -> EditEvent {
        // A new press always supersedes a drag that never saw its release.
        self.drag = Drag::Idle;
        match self.tool {
            Tool::AddJoint => self.add_joint(skeleton, p),
            Tool::AddBone => self.add_bone(skeleton, p),
            Tool::Select => self.select(skeleton, p),
        }
    }

    pub fn pointer_move(&mut self, skeleton: &mut Skeleton, p: Vec2) -> EditEvent {
        match self.drag {
            Drag::Idle => EditEvent::Nothing,
            Drag::Moving { bone, pointer_anchor, start_position } => {
                if !skeleton.update_bone(bone, BonePatch::new().position(start_position + (p - pointer_anchor))) {
                    self.drag = Drag::Idle;
                    return EditEvent::Nothing;
                }
                EditEvent::Dragged(bone)
            }
            Drag::Rotating { bone, last_angle } => {
                let Some(rotation) = skeleton.bone(bone).map(|b| b.rotation) else {
                    self.drag = Drag::Idle;
                    return EditEvent::Nothing;
                };
                let origin = skeleton.world_transform(bone).position;
                let now = angle_between(origin, p);
                skeleton.update_bone(bone, BonePatch::new().rotation(rotation + angle_delta(last_angle, now)));
                self.drag = Drag::Rotating { bone, last_angle: now };
                EditEvent::Dragged(bone)
            }
        }
    }

    pub fn pointer_up(&mut self) -> EditEvent {
        match std::mem::take(&mut self.drag).bone() {
            Some(bone) => {
                log::debug!("drag on {bone} ended");
                EditEvent::DragEnded(bone)
            }
            None => EditEvent::Nothing,
        }
    }

    /// Release outside the tracked surface ends the drag exactly like
    /// [`PoseEditor::pointer_up`].
    pub fn pointer_up_outside(&mut self) -> EditEvent {
        self.pointer_up()
    }

    fn add_joint(&mut self, skeleton: &mut Skeleton, p: Vec2) -> EditEvent {
        match skeleton.add_bone(None, p, 0.0, 0.0) {
            Ok(id) => {
                skeleton.set_active(Some(id));
                EditEvent::Created(id)
            }
            Err(e) => {
                log::warn!("joint not created: {e}");
                EditEvent::Nothing
            }
        }
    }

    fn add_bone(&mut self, skeleton: &mut Skeleton, p: Vec2) -> EditEvent {
        // The anchor may have been deleted since it was picked.
        let pending = self.pending.filter(|(bone, _)| skeleton.contains(*bone));
        let Some((anchor, point)) = pending else {
            self.pending = None;
            return match find_closest_bone(skeleton, p, self.pick_radius) {
                Some(pick) => {
                    self.pending = Some((pick.bone, pick.point));
                    EditEvent::AnchorSet { bone: pick.bone, point: pick.point }
                }
                None => EditEvent::Nothing,
            };
        };

        let anchor_wt = skeleton.world_transform(anchor);
        let (start, local) = match point {
            AnchorPoint::Origin => (anchor_wt.position, Vec2::ZERO),
            AnchorPoint::End => {
                let len = skeleton.bone(anchor).map_or(0.0, |b| b.length);
                (skeleton.end_point(anchor), Vec2::new(len, 0.0))
            }
        };
        let angle = angle_between(start, p);
        let length = distance(start, p);

        match skeleton.add_bone(Some(anchor), local, angle - anchor_wt.rotation, length) {
            Ok(id) => {
                skeleton.set_active(Some(id));
                // Keep chaining from the new tip.
                self.pending = Some((id, AnchorPoint::End));
                EditEvent::Created(id)
            }
            Err(e) => {
                log::warn!("bone not created: {e}");
                self.pending = None;
                EditEvent::Nothing
            }
        }
    }

    fn select(&mut self, skeleton: &mut Skeleton, p: Vec2) -> EditEvent {
        let Some(pick) = find_closest_bone(skeleton, p, self.pick_radius) else {
            skeleton.set_active(None);
            return EditEvent::SelectionCleared;
        };
        let Some((is_root, position)) = skeleton.bone(pick.bone).map(|b| (b.is_root(), b.position)) else {
            return EditEvent::Nothing;
        };
        skeleton.set_active(Some(pick.bone));

        self.drag = if is_root {
            Drag::Moving { bone: pick.bone, pointer_anchor: p, start_position: position }
        } else {
            let origin = skeleton.world_transform(pick.bone).position;
            Drag::Rotating { bone: pick.bone, last_angle: angle_between(origin, p) }
        };
        let mode = self.drag.mode().unwrap_or(DragMode::Rotate);
        log::debug!("drag on {} started ({mode:?})", pick.bone);
        EditEvent::DragStarted { bone: pick.bone, mode }
    }
}
