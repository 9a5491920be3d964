//! Viewer
//!
//! Owns the content scene, the helper overlay, the camera with its controls,
//! the selection and the background slot, and exposes the command surface the
//! host UI talks to.
//!
//! # Redraw model
//!
//! Every state-changing command records a [`RedrawFlags`] reason instead of
//! drawing. [`Viewer::tick`] runs once per animation frame: it advances the
//! camera controls and, if any reason is pending, renders exactly once and
//! consumes the flags.
//!
//! ```rust,ignore
//! let mut viewer = Viewer::new(ViewerSettings::default(), 800, 600);
//! viewer.update_shape_object_json(payload)?;
//! viewer.zoom_all();
//! loop {
//!     viewer.tick(dt, &mut backend);
//! }
//! ```

use bitflags::bitflags;
use glam::Vec3;

use crate::controls::{Input, TrackballControls};
use crate::errors::{Result, ViewerError};
use crate::framing::CameraFramingController;
use crate::geom::{self, BoundingBox};
use crate::helpers::HelperOverlay;
use crate::interaction::{InteractionMode, InteractionOutcome, PointerContext};
use crate::picking::{PickingResolver, PointerEvent, PointerEventKind, SurfaceRect};
use crate::scene::{BackgroundLayer, BackgroundSlot, Camera, CameraPose, LoadTicket, NodeHandle, Scene};
use crate::selection::{SelectionChange, SelectionState};
use crate::settings::ViewerSettings;
use crate::shape::{self, ShapePayload, ShapeUpdate};

bitflags! {
    /// Reasons for the next frame to be drawn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RedrawFlags: u32 {
        const CONTROLS   = 1 << 0;
        const SELECTION  = 1 << 1;
        const CAMERA     = 1 << 2;
        const RESIZE     = 1 << 3;
        const BACKGROUND = 1 << 4;
        const CONTENT    = 1 << 5;
        const HELPERS    = 1 << 6;
    }
}

/// Which scene a [`RenderBackend::draw_scene`] call carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneLayer {
    Helpers,
    Content,
}

/// The renderer the viewer draws through.
pub trait RenderBackend {
    /// Clears color and depth.
    fn clear(&mut self);
    /// Draws the full-screen background with its own orthographic camera.
    fn draw_background(&mut self, layer: &BackgroundLayer);
    fn draw_scene(&mut self, layer: SceneLayer, scene: &Scene, camera: &Camera);
}

/// What [`Viewer::point_camera_at`] aims at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusTarget {
    /// Center of the node's bounding box.
    Node(NodeHandle),
    Point(Vec3),
}

pub struct Viewer {
    settings: ViewerSettings,

    // === Scenes ===
    scene: Scene,
    helpers: HelperOverlay,

    // === Camera ===
    camera: Camera,
    controls: TrackballControls,
    input: Input,
    framing: CameraFramingController,

    // === Interaction ===
    picking: PickingResolver,
    selection: SelectionState,
    mode: InteractionMode,
    surface: SurfaceRect,

    // === Background ===
    background: BackgroundSlot,
    pending_background: Option<LoadTicket>,

    dirty: RedrawFlags,
    /// Reasons consumed by the most recent frame.
    last_frame_reasons: RedrawFlags,
    frame_count: u64,
}

impl Viewer {
    #[must_use]
    pub fn new(settings: ViewerSettings, width: u32, height: u32) -> Self {
        let surface = SurfaceRect::new(0.0, 0.0, width as f32, height as f32);

        let mut camera = Camera::new_perspective(settings.fov, surface.aspect(), settings.near, settings.far);
        camera.set_pose(CameraPose {
            position: Vec3::new(0.0, 0.0, settings.initial_distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
        });

        let mut input = Input::new();
        input.handle_resize(width, height);

        let mut background = BackgroundSlot::new();
        let pending_background = settings.background_url.as_deref().map(|url| background.request(url));

        log::info!("Viewer created ({width}x{height}, fov {}°)", settings.fov);

        Self {
            scene: Scene::new(),
            helpers: HelperOverlay::new(&settings),
            controls: TrackballControls::new(&settings.controls),
            framing: CameraFramingController::new(settings.min_view_distance, settings.default_view_distance),
            picking: PickingResolver::new(settings.line_pick_threshold),
            camera,
            input,
            selection: SelectionState::new(),
            mode: InteractionMode::Idle,
            surface,
            background,
            pending_background,
            dirty: RedrawFlags::all(),
            last_frame_reasons: RedrawFlags::empty(),
            frame_count: 0,
            settings,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the content scene. Marks the content dirty; the
    /// selection catches up with removed or reshaped geometry on the next
    /// tick.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.dirty |= RedrawFlags::CONTENT;
        &mut self.scene
    }

    #[must_use]
    pub fn helpers(&self) -> &HelperOverlay {
        &self.helpers
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn controls(&self) -> &TrackballControls {
        &self.controls
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn selected(&self) -> Option<NodeHandle> {
        self.selection.selected()
    }

    #[must_use]
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    #[must_use]
    pub fn background(&self) -> &BackgroundSlot {
        &self.background
    }

    #[must_use]
    pub fn surface(&self) -> &SurfaceRect {
        &self.surface
    }

    #[must_use]
    pub fn dirty_flags(&self) -> RedrawFlags {
        self.dirty
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn mark_dirty(&mut self, reason: RedrawFlags) {
        self.dirty |= reason;
    }

    /// Redraw reasons the most recent frame was drawn for.
    #[must_use]
    pub fn last_frame_reasons(&self) -> RedrawFlags {
        self.last_frame_reasons
    }

    /// Number of frames rendered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Selects `node`, or clears the selection for `None`. Clearing always
    /// schedules a redraw; re-selecting the current node does not.
    pub fn select(&mut self, node: Option<NodeHandle>) -> SelectionChange {
        let change = self.selection.select(&self.scene, node);
        if change.needs_redraw() {
            self.helpers.update_selection_shape(self.selection.gizmo());
            self.dirty |= RedrawFlags::SELECTION;
        }
        change
    }

    /// Brings the selection in line with the content scene: drops a selection
    /// whose node is gone and re-lays out the gizmo after content changes.
    fn sync_selection(&mut self) {
        self.forget_removed_selection();
        if self.dirty.contains(RedrawFlags::CONTENT) && self.selection.selected().is_some() {
            self.selection.refresh(&self.scene);
            self.helpers.update_selection_shape(self.selection.gizmo());
        }
    }

    fn forget_removed_selection(&mut self) {
        if self.selection.forget_removed(&self.scene) {
            if let InteractionMode::Dragging { node, .. } = self.mode
                && !self.scene.contains(node)
            {
                self.end_drag();
            }
            self.helpers.update_selection_shape(self.selection.gizmo());
            self.dirty |= RedrawFlags::SELECTION;
        }
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Loads a scene description. A named collection replaces the one loaded
    /// earlier under the same name.
    pub fn update_shape_object(&mut self, payload: &ShapePayload) -> Result<ShapeUpdate> {
        let update = shape::update_shape_object(&mut self.scene, payload)?;
        self.forget_removed_selection();
        self.dirty |= RedrawFlags::CONTENT;
        Ok(update)
    }

    pub fn update_shape_object_json(&mut self, json: &str) -> Result<ShapeUpdate> {
        let payload = ShapePayload::from_json(json)?;
        self.update_shape_object(&payload)
    }

    /// Removes every loaded solid.
    pub fn clear_all(&mut self) {
        if let Some(root) = shape::find_solids_root(&self.scene) {
            self.scene.remove_node(root);
            log::info!("Cleared all solids");
        }
        self.forget_removed_selection();
        self.dirty |= RedrawFlags::CONTENT;
    }

    /// First node named `name` below the solids root.
    #[must_use]
    pub fn get_solid_by_name(&self, name: &str) -> Option<NodeHandle> {
        let root = shape::find_solids_root(&self.scene)?;
        self.scene.find_by_name(Some(root), name)
    }

    /// Like [`get_solid_by_name`](Self::get_solid_by_name), failing with
    /// [`ViewerError::NodeNotFound`].
    pub fn solid_by_name(&self, name: &str) -> Result<NodeHandle> {
        self.get_solid_by_name(name)
            .ok_or_else(|| ViewerError::NodeNotFound(name.to_string()))
    }

    /// World box of `node`, or of all solids for `None`.
    #[must_use]
    pub fn get_object_box(&self, node: Option<NodeHandle>) -> BoundingBox {
        match node.or_else(|| shape::find_solids_root(&self.scene)) {
            Some(n) => geom::bounding_box(&self.scene, n),
            None => BoundingBox::EMPTY,
        }
    }

    /// Center of [`get_object_box`](Self::get_object_box); the origin when
    /// the box is empty.
    #[must_use]
    pub fn get_object_center(&self, node: Option<NodeHandle>) -> Vec3 {
        let bbox = self.get_object_box(node);
        if bbox.is_empty() { Vec3::ZERO } else { bbox.center() }
    }

    // ========================================================================
    // Camera commands
    // ========================================================================

    /// Frames `node`; for `None`, the selection or else every solid.
    /// Returns `false` when there is nothing to frame.
    pub fn zoom_object(&mut self, node: Option<NodeHandle>) -> bool {
        let target = node
            .or(self.selection.selected())
            .or_else(|| shape::find_solids_root(&self.scene));
        let Some(target) = target else {
            return false;
        };

        let changed = self.framing.zoom_to_fit(&mut self.camera, &self.scene, target);
        if changed {
            self.dirty |= RedrawFlags::CAMERA;
        }
        changed
    }

    /// Frames the selection, or every solid when nothing is selected.
    pub fn zoom_all(&mut self) -> bool {
        self.zoom_object(None)
    }

    /// Pans the camera onto a node's center or a point. An empty node is
    /// ignored.
    pub fn point_camera_at(&mut self, focus: FocusTarget) -> bool {
        let point = match focus {
            FocusTarget::Point(p) => p,
            FocusTarget::Node(n) => match geom::center_of_gravity(&self.scene, n) {
                Some(c) => c,
                None => return false,
            },
        };
        self.framing.point_camera_to(&mut self.camera, point);
        self.dirty |= RedrawFlags::CAMERA;
        true
    }

    /// Switches to a named preset view. Unknown names change nothing.
    pub fn set_preset_view(&mut self, name: &str) -> bool {
        let changed = self.framing.apply_preset(&mut self.camera, name);
        if changed {
            self.dirty |= RedrawFlags::CAMERA;
        }
        changed
    }

    pub fn show_grid(&mut self, visible: bool) {
        if self.helpers.set_grid_visible(visible) {
            self.dirty |= RedrawFlags::HELPERS;
        }
    }

    /// Sets the surface size; aspect and projection follow immediately.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.width = width as f32;
        self.surface.height = height as f32;
        self.input.handle_resize(width, height);
        self.camera.set_aspect(self.surface.aspect());
        self.dirty |= RedrawFlags::RESIZE;
    }

    /// Sets the on-page position and size of the surface.
    pub fn set_surface_rect(&mut self, rect: SurfaceRect) {
        self.surface = rect;
        self.input.handle_resize(rect.width.max(0.0) as u32, rect.height.max(0.0) as u32);
        self.camera.set_aspect(rect.aspect());
        self.dirty |= RedrawFlags::RESIZE;
    }

    // ========================================================================
    // Background
    // ========================================================================

    /// Requests a new background image. The host loads it and reports back
    /// through [`on_background_loaded`](Self::on_background_loaded).
    pub fn set_graduated_background(&mut self, url: &str) -> LoadTicket {
        let had_layer = self.background.current().is_some();
        let ticket = self.background.request(url);
        if had_layer {
            self.dirty |= RedrawFlags::BACKGROUND;
        }
        self.pending_background = Some(ticket.clone());
        ticket
    }

    /// Hands out the request made at start-up or by the last
    /// [`set_graduated_background`](Self::set_graduated_background) call.
    pub fn take_background_request(&mut self) -> Option<LoadTicket> {
        self.pending_background.take()
    }

    /// Delivers a finished or failed background load. Stale or already
    /// completed tickets are ignored.
    ///
    /// A failure is reported as [`ViewerError::BackgroundLoad`]; the viewer
    /// keeps running without a background.
    pub fn on_background_loaded(&mut self, ticket: &LoadTicket, result: Result<BackgroundLayer>) -> bool {
        let accepted = self.background.complete(ticket, result);
        if accepted {
            self.dirty |= RedrawFlags::BACKGROUND;
        }
        accepted
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Feeds one pointer event in page coordinates.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match event.kind {
            PointerEventKind::Move => self
                .input
                .handle_cursor_move(event.client_x - self.surface.left, event.client_y - self.surface.top),
            PointerEventKind::Down => self.input.handle_button(event.button, true),
            PointerEventKind::Up => self.input.handle_button(event.button, false),
            PointerEventKind::Click => {}
        }

        let mut ctx = PointerContext {
            scene: &mut self.scene,
            camera: &self.camera,
            picking: &self.picking,
            selected: self.selection.selected(),
            rect: &self.surface,
        };
        let outcome = self.mode.handle(event, &mut ctx);

        match outcome {
            InteractionOutcome::None => {}
            InteractionOutcome::Select(node) => {
                self.select(node);
            }
            InteractionOutcome::DragStarted(_) => {
                self.controls.enabled = false;
                self.controls.stop();
                self.input.release_all();
            }
            InteractionOutcome::Moved(_) => {
                self.dirty |= RedrawFlags::CONTENT | RedrawFlags::HELPERS;
            }
            InteractionOutcome::DragEnded(_) => self.end_drag(),
        }
    }

    fn end_drag(&mut self) {
        self.mode = InteractionMode::Idle;
        self.controls.enabled = true;
    }

    /// Wheel motion; positive values zoom in.
    pub fn handle_wheel(&mut self, delta: f32) {
        self.input.handle_mouse_wheel(delta);
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// One animation tick: advances the controls, then renders if anything
    /// asked for a redraw. Returns whether a frame was drawn.
    pub fn tick(&mut self, dt: f32, backend: &mut dyn RenderBackend) -> bool {
        if !self.mode.is_dragging() && self.controls.update(&mut self.camera, &self.input, dt) {
            self.dirty |= RedrawFlags::CONTROLS;
        }
        self.input.end_frame();
        self.sync_selection();

        if self.dirty.is_empty() {
            return false;
        }
        self.render(backend);
        true
    }

    /// Draws one frame and consumes the redraw flags.
    ///
    /// Order: clear, background (when loaded), world matrix refresh of both
    /// scenes, helpers, content.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        self.sync_selection();
        backend.clear();

        if let Some(layer) = self.background.current() {
            backend.draw_background(layer);
        }

        self.helpers.follow_selection(self.selection.gizmo(), &self.scene);
        self.helpers.scene.update_matrix_world();
        self.scene.update_matrix_world();

        backend.draw_scene(SceneLayer::Helpers, &self.helpers.scene, &self.camera);
        backend.draw_scene(SceneLayer::Content, &self.scene, &self.camera);

        log::trace!("Frame {} drawn ({:?})", self.frame_count, self.dirty);
        self.last_frame_reasons = self.dirty;
        self.dirty = RedrawFlags::empty();
        self.frame_count += 1;
    }
}
