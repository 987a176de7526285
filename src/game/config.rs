// Session configuration: the values a (re)slice is built from
//
// Exported as JSON wrapped in a triple-backtick fence so it survives being
// pasted into chat tools; import accepts the fenced or bare form and merges
// only the fields that are present.

use super::characters::Motion;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Default display time of one frame, per motion
pub const DEFAULT_FRAME_DELAY_MS: u32 = 250;

/// Default sprite scale in percent
pub const DEFAULT_SPRITE_SCALE: f32 = 100.0;

const FENCE: &str = "```";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field}: must be a number >= 1")]
    OutOfRange { field: &'static str },

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-motion frame delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDelays {
    pub walk: u32,
    pub idle: u32,
    pub attack: u32,
}

impl FrameDelays {
    pub fn for_motion(&self, motion: Motion) -> u32 {
        match motion {
            Motion::Walk => self.walk,
            Motion::Idle => self.idle,
            Motion::Attack => self.attack,
        }
    }
}

impl Default for FrameDelays {
    fn default() -> Self {
        Self {
            walk: DEFAULT_FRAME_DELAY_MS,
            idle: DEFAULT_FRAME_DELAY_MS,
            attack: DEFAULT_FRAME_DELAY_MS,
        }
    }
}

/// Everything needed to slice and animate one sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File path, `file://` URL or remote URL of the sheet
    pub image_url: String,
    /// One row specification per line
    pub row_config: String,
    /// One `<ranges>:<action>` line per clip
    pub action_ranges: String,
    pub frame_delays: FrameDelays,
    /// Percent; 100 draws frames at their native size
    pub sprite_scale: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            row_config: String::new(),
            action_ranges: String::new(),
            frame_delays: FrameDelays::default(),
            sprite_scale: DEFAULT_SPRITE_SCALE,
        }
    }
}

/// Partial configuration as found in an import
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    #[serde(default, deserialize_with = "present")]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "present")]
    row_config: Option<String>,
    #[serde(default, deserialize_with = "present")]
    action_ranges: Option<String>,
    #[serde(default, deserialize_with = "present")]
    frame_delays: Option<DelayPatch>,
    #[serde(default, deserialize_with = "present")]
    sprite_scale: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DelayPatch {
    #[serde(default, deserialize_with = "present")]
    walk: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    idle: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    attack: Option<f64>,
}

/// A key that is written must hold a real value; only absence means "keep"
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ConfigPatch {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(delays) = &self.frame_delays {
            for (field, value) in [
                ("walk frame delay", delays.walk),
                ("idle frame delay", delays.idle),
                ("attack frame delay", delays.attack),
            ] {
                check_at_least_one(field, value)?;
            }
        }
        check_at_least_one("sprite scale", self.sprite_scale)
    }

    /// Merge into `config`; empty strings leave the current value alone
    fn apply(self, config: &mut SessionConfig) {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        if let Some(url) = non_empty(self.image_url) {
            config.image_url = url;
        }
        if let Some(rows) = non_empty(self.row_config) {
            config.row_config = rows;
        }
        if let Some(actions) = non_empty(self.action_ranges) {
            config.action_ranges = actions;
        }
        if let Some(delays) = self.frame_delays {
            let delays_ms = |value: Option<f64>, current: u32| value.map_or(current, |v| v as u32);
            config.frame_delays.walk = delays_ms(delays.walk, config.frame_delays.walk);
            config.frame_delays.idle = delays_ms(delays.idle, config.frame_delays.idle);
            config.frame_delays.attack = delays_ms(delays.attack, config.frame_delays.attack);
        }
        if let Some(scale) = self.sprite_scale {
            config.sprite_scale = scale as f32;
        }
    }
}

fn check_at_least_one(field: &'static str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(v >= 1.0) => Err(ConfigError::OutOfRange { field }),
        _ => Ok(()),
    }
}

/// Remove an optional surrounding triple-backtick fence
fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix(FENCE).unwrap_or(text);
    let text = text.strip_suffix(FENCE).unwrap_or(text);
    text.trim()
}

impl SessionConfig {
    /// Serialize as fenced JSON
    pub fn export(&self) -> Result<String, ConfigError> {
        let mut exported = self.clone();
        exported.image_url = exported.image_url.trim().to_string();
        exported.row_config = exported.row_config.trim().to_string();
        exported.action_ranges = exported.action_ranges.trim().to_string();

        let json = serde_json::to_string(&exported)?;
        Ok(format!("{FENCE}{json}{FENCE}"))
    }

    /// Merge fenced or bare JSON into this configuration
    ///
    /// Validation happens before anything is applied, so a rejected import
    /// leaves the configuration untouched.
    pub fn import(&mut self, text: &str) -> Result<(), ConfigError> {
        let patch: ConfigPatch = serde_json::from_str(strip_fence(text))?;
        patch.validate()?;
        patch.apply(self);
        Ok(())
    }

    /// Parse a configuration, starting from defaults
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.import(text)?;
        Ok(config)
    }

    /// Read a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Row specification lines, blank lines removed
    pub fn rows(&self) -> Vec<&str> {
        self.row_config
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// Sprite scale as a multiplier
    pub fn scale_factor(&self) -> f32 {
        if self.sprite_scale > 0.0 {
            self.sprite_scale / 100.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.frame_delays.walk, 250);
        assert_relative_eq!(config.scale_factor(), 1.0);
    }

    #[test]
    fn test_export_is_fenced_json() {
        let config = SessionConfig {
            image_url: " hero.png ".to_string(),
            row_config: "4:32x32".to_string(),
            ..SessionConfig::default()
        };

        let exported = config.export().unwrap();
        assert!(exported.starts_with("```{"));
        assert!(exported.ends_with("}```"));
        assert!(exported.contains("\"image_url\":\"hero.png\""));
        assert!(exported.contains("\"frame_delays\""));
    }

    #[test]
    fn test_import_round_trips_export() {
        let original = SessionConfig {
            image_url: "sheets/knight.png".to_string(),
            row_config: "4:32x32\n2:32x32,2:32x32:whitespace".to_string(),
            action_ranges: "1-4:side_walk\n5-6:side_attack".to_string(),
            frame_delays: FrameDelays {
                walk: 120,
                idle: 300,
                attack: 80,
            },
            sprite_scale: 250.0,
        };

        let imported = SessionConfig::parse(&original.export().unwrap()).unwrap();
        assert_eq!(imported, original);
    }

    #[test]
    fn test_import_merges_partial_config() {
        let mut config = SessionConfig {
            image_url: "old.png".to_string(),
            row_config: "1:8x8".to_string(),
            ..SessionConfig::default()
        };

        config
            .import(r#"{"image_url": "", "row_config": "2:16x16", "frame_delays": {"idle": 90}}"#)
            .unwrap();

        assert_eq!(config.image_url, "old.png");
        assert_eq!(config.row_config, "2:16x16");
        assert_eq!(config.frame_delays.idle, 90);
        assert_eq!(config.frame_delays.walk, 250);
    }

    #[test]
    fn test_import_rejects_small_delay_without_applying() {
        let mut config = SessionConfig::default();
        let err = config
            .import(r#"```{"row_config": "1:8x8", "frame_delays": {"walk": 0}}```"#)
            .unwrap_err();

        assert!(matches!(err, ConfigError::OutOfRange { field: "walk frame delay" }));
        assert!(config.row_config.is_empty());
    }

    #[test]
    fn test_import_rejects_small_scale() {
        let err = SessionConfig::parse(r#"{"sprite_scale": 0.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "sprite scale" }));
    }

    #[test]
    fn test_import_rejects_wrong_types() {
        assert!(matches!(
            SessionConfig::parse(r#"{"row_config": 4}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            SessionConfig::parse("[1, 2]"),
            Err(ConfigError::Json(_))
        ));
        for text in [
            r#"{"frame_delays": null}"#,
            r#"{"image_url": null}"#,
            r#"{"frame_delays": {"walk": null}}"#,
            r#"{"sprite_scale": null}"#,
        ] {
            assert!(
                matches!(SessionConfig::parse(text), Err(ConfigError::Json(_))),
                "{text} should be rejected"
            );
        }
        // Absent keys are still fine
        assert!(SessionConfig::parse(r#"{"frame_delays": {}}"#).is_ok());
    }

    #[test]
    fn test_rows_skip_blank_lines() {
        let config = SessionConfig {
            row_config: "1:8x8\n\n  \n2:8x8".to_string(),
            ..SessionConfig::default()
        };
        assert_eq!(config.rows(), vec!["1:8x8", "2:8x8"]);
    }

    #[test]
    fn test_frame_delays_by_motion() {
        let delays = FrameDelays {
            walk: 1,
            idle: 2,
            attack: 3,
        };
        assert_eq!(delays.for_motion(Motion::Walk), 1);
        assert_eq!(delays.for_motion(Motion::Idle), 2);
        assert_eq!(delays.for_motion(Motion::Attack), 3);
    }
}
