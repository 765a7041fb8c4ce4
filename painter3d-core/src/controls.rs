/// Keyboard-driven camera mutation hooks
use crate::projection::Camera;

/// Step sizes for camera movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSettings {
    /// World units per key press
    pub move_speed: f64,
    /// Radians per key press
    pub turn_speed: f64,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            turn_speed: 0.05,
        }
    }
}

/// A discrete camera adjustment. Movement is along world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
}

impl CameraAction {
    /// Map a browser-style key name (`"w"`, `" "`, `"Shift"`, `"ArrowLeft"`, ...)
    pub fn from_key(key: &str) -> Option<Self> {
        let action = match key {
            "w" => CameraAction::Forward,
            "s" => CameraAction::Back,
            "a" => CameraAction::Left,
            "d" => CameraAction::Right,
            " " => CameraAction::Up,
            "Shift" => CameraAction::Down,
            "ArrowLeft" => CameraAction::YawLeft,
            "ArrowRight" => CameraAction::YawRight,
            "ArrowUp" => CameraAction::PitchUp,
            "ArrowDown" => CameraAction::PitchDown,
            _ => return None,
        };
        Some(action)
    }

    pub fn apply(self, camera: &mut Camera, settings: &ControlSettings) {
        let step = settings.move_speed;
        let turn = settings.turn_speed;
        match self {
            CameraAction::Forward => camera.position.z -= step,
            CameraAction::Back => camera.position.z += step,
            CameraAction::Left => camera.position.x += step,
            CameraAction::Right => camera.position.x -= step,
            CameraAction::Up => camera.position.y += step,
            CameraAction::Down => camera.position.y -= step,
            CameraAction::YawLeft => camera.rotation.rotate(0.0, turn, 0.0),
            CameraAction::YawRight => camera.rotation.rotate(0.0, -turn, 0.0),
            CameraAction::PitchUp => camera.rotation.rotate(-turn, 0.0, 0.0),
            CameraAction::PitchDown => camera.rotation.rotate(turn, 0.0, 0.0),
        }
    }
}
