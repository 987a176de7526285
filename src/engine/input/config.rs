// Input binding table

use super::action::{default_bindings, Action, InputSource};
use std::collections::HashMap;

/// Rebindable map from keys/buttons to actions
///
/// A source drives at most one action; an action may have several sources
/// (WASD and the arrow keys both move).
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,
}

impl InputConfig {
    /// Create a table with nothing bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the default bindings
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        for (source, action) in default_bindings() {
            config.bind(source, action);
        }
        config
    }

    /// Bind `source` to `action`; returns the action it drove before
    pub fn bind(&mut self, source: InputSource, action: Action) -> Option<Action> {
        self.bindings.insert(source, action)
    }

    /// Action driven by `source`
    pub fn action_for(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::MouseButton;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_returns_previous_action() {
        let mut config = InputConfig::new();
        let key = InputSource::key(KeyCode::KeyH);

        assert_eq!(config.bind(key, Action::MoveLeft), None);
        assert_eq!(config.bind(key, Action::MoveRight), Some(Action::MoveLeft));
        assert_eq!(config.action_for(key), Some(Action::MoveRight));
    }

    #[test]
    fn test_defaults() {
        let config = InputConfig::with_defaults();

        for key in [KeyCode::KeyA, KeyCode::ArrowLeft] {
            assert_eq!(
                config.action_for(InputSource::key(key)),
                Some(Action::MoveLeft)
            );
        }
        assert_eq!(
            config.action_for(InputSource::mouse(MouseButton::Left)),
            Some(Action::Primary)
        );
        assert_eq!(
            config.action_for(InputSource::key(KeyCode::F5)),
            Some(Action::Reload)
        );
    }
}
