// Input action definitions and default bindings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Everything the user can do with keyboard and mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    /// Aimed attack on the play field, drag on the preview
    Primary,

    // Meta actions
    Reload,
    Quit,
}

impl Action {
    /// Whether this action is one of the four movement directions
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Self::MoveUp | Self::MoveDown | Self::MoveLeft | Self::MoveRight
        )
    }
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::KeyW), Action::MoveUp),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyS), Action::MoveDown),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowUp), Action::MoveUp),
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowDown), Action::MoveDown),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::mouse(MouseButton::Left), Action::Primary),
        (InputSource::key(KeyCode::F5), Action::Reload),
        (InputSource::key(KeyCode::Escape), Action::Quit),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_actions() {
        assert!(Action::MoveUp.is_movement());
        assert!(Action::MoveRight.is_movement());
        assert!(!Action::Primary.is_movement());
        assert!(!Action::Reload.is_movement());
    }

    #[test]
    fn test_default_bindings_cover_wasd() {
        let bindings = default_bindings();
        for (code, action) in [
            (KeyCode::KeyW, Action::MoveUp),
            (KeyCode::KeyA, Action::MoveLeft),
            (KeyCode::KeyS, Action::MoveDown),
            (KeyCode::KeyD, Action::MoveRight),
        ] {
            assert!(bindings.contains(&(InputSource::key(code), action)));
        }
    }

    #[test]
    fn test_primary_is_left_mouse() {
        let bindings = default_bindings();
        assert!(bindings.contains(&(InputSource::mouse(MouseButton::Left), Action::Primary)));
    }

    #[test]
    fn test_no_duplicate_inputs() {
        let bindings = default_bindings();
        let mut seen_sources = std::collections::HashSet::new();
        for (source, _) in bindings {
            assert!(
                seen_sources.insert(source),
                "Duplicate input source found in default bindings"
            );
        }
    }
}
