use crate::{
    events::dispatcher::{Event, EventDispatcher, Listener},
    foundation::error::{StampError, StampResult},
    math::vector2::Vector2,
    scene::camera::Camera,
};

/// Zoom and pan switches of an [`OrbitController`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrbitOptions {
    pub enable_zoom: bool,
    /// Exponent applied to the 0.95 zoom step.
    pub zoom_speed: f64,
    pub enable_pan: bool,
    pub pan_speed: f64,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            enable_zoom: true,
            zoom_speed: 3.0,
            enable_pan: true,
            pan_speed: 1.0,
        }
    }
}

impl OrbitOptions {
    pub fn validate(&self) -> StampResult<()> {
        if !self.zoom_speed.is_finite() {
            return Err(StampError::validation("orbit zoom_speed must be finite"));
        }
        if !self.pan_speed.is_finite() {
            return Err(StampError::validation("orbit pan_speed must be finite"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrbitState {
    #[default]
    Idle,
    Panning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrbitEventKind {
    Change,
}

/// Emitted after the controller moved or zoomed the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitEvent {
    pub kind: OrbitEventKind,
    /// Camera as it was written by the controller.
    pub camera: Camera,
    target: Option<()>,
}

impl OrbitEvent {
    fn change(camera: Camera) -> Self {
        Self {
            kind: OrbitEventKind::Change,
            camera,
            target: None,
        }
    }

    /// Whether the event is currently being delivered.
    pub fn in_flight(&self) -> bool {
        self.target.is_some()
    }
}

impl Event for OrbitEvent {
    type Kind = OrbitEventKind;
    type Target = ();

    fn kind(&self) -> OrbitEventKind {
        self.kind
    }

    fn set_target(&mut self, target: Option<()>) {
        self.target = target;
    }
}

pub type OrbitListener = Listener<OrbitEvent, ()>;

/// Values captured when a gesture starts.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Stage {
    camera_zoom: f64,
    camera_position: Vector2,
    pan_start: Vector2,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            camera_zoom: 1.0,
            camera_position: Vector2::ZERO,
            pan_start: Vector2::ZERO,
        }
    }
}

/// Wheel zoom and drag pan for a scene camera.
///
/// The controller does not own the camera; every gesture method takes the camera it
/// should move, which keeps the camera inside its scene.
#[derive(Debug, Default)]
pub struct OrbitController {
    pub options: OrbitOptions,
    state: OrbitState,
    stage: Stage,
    events: EventDispatcher<OrbitEvent, ()>,
}

impl OrbitController {
    pub fn new(options: OrbitOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn is_panning(&self) -> bool {
        self.state == OrbitState::Panning
    }

    /// Zoom level the camera had before the last [`OrbitController::do_scale`].
    pub fn zoom_before_scale(&self) -> f64 {
        self.stage.camera_zoom
    }

    pub fn add_event_listener(&mut self, kind: OrbitEventKind, listener: &OrbitListener) {
        self.events.add_event_listener(kind, listener);
    }

    pub fn remove_event_listener(&mut self, kind: OrbitEventKind, listener: &OrbitListener) {
        self.events.remove_event_listener(kind, listener);
    }

    pub fn has_event_listener(&self, kind: OrbitEventKind, listener: &OrbitListener) -> bool {
        self.events.has_event_listener(kind, listener)
    }

    /// Wheel step: a positive `delta_y` shrinks zoom by `0.95^zoom_speed`, anything else grows it.
    pub fn do_scale(&mut self, camera: &mut Camera, delta_y: f64) -> StampResult<()> {
        if !self.options.enable_zoom {
            return Ok(());
        }
        self.stage.camera_zoom = camera.zoom;
        let step = 0.95_f64.powf(self.options.zoom_speed);
        if delta_y > 0.0 {
            camera.zoom *= step;
        } else {
            camera.zoom /= step;
        }
        tracing::trace!(zoom = camera.zoom, "orbit zoom");
        self.emit_change(*camera)
    }

    pub fn pointer_down(&mut self, camera: &Camera, client_x: f64, client_y: f64) {
        if !self.options.enable_pan {
            return;
        }
        self.state = OrbitState::Panning;
        self.stage.camera_position = camera.position;
        self.stage.pan_start = Vector2::new(client_x, client_y);
    }

    /// Drag: the camera moves opposite to the pointer, scaled by zoom so the content tracks it.
    pub fn pointer_move(
        &mut self,
        camera: &mut Camera,
        client_x: f64,
        client_y: f64,
    ) -> StampResult<()> {
        if !self.options.enable_pan || !self.is_panning() {
            return Ok(());
        }
        let mut delta = Vector2::ZERO;
        delta
            .sub_vectors(self.stage.pan_start, Vector2::new(client_x, client_y))
            .multiply_scalar(camera.zoom * self.options.pan_speed);
        let mut position = self.stage.camera_position;
        position.add_vector(delta);
        camera.position = position;
        self.emit_change(*camera)
    }

    pub fn pointer_up(&mut self) {
        self.state = OrbitState::Idle;
    }

    fn emit_change(&mut self, camera: Camera) -> StampResult<()> {
        let mut event = OrbitEvent::change(camera);
        self.events
            .dispatch_event(&mut (), &mut event, ())
            .map_err(StampError::from)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/control/orbit.rs"]
mod tests;
