//! Per-form navigation settings.
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    event::key::{Key, KeyCode},
    level::StepMode,
};

/// Navigation settings for one form instance.
///
/// ```toml
/// step_mode = "group"
/// navigation_enabled = true
/// confirm_key = "enter"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Granularity of a step.
    pub step_mode: StepMode,
    /// When false, every navigation request is denied.
    pub navigation_enabled: bool,
    /// The key that advances or submits from the form or an input.
    pub confirm_key: Key,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_mode: StepMode::default(),
            navigation_enabled: true,
            confirm_key: Key::from(KeyCode::Enter),
        }
    }
}

impl Config {
    /// Parse TOML settings. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Reject settings that parse but can't be honoured.
    pub fn check(&self) -> Result<()> {
        if self.confirm_key.mods.any() {
            return Err(Error::Config(format!(
                "confirm_key {} must not carry modifiers",
                self.confirm_key
            )));
        }
        Ok(())
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() -> Result<()> {
        let c = Config::from_toml("")?;
        assert_eq!(c, Config::default());
        assert_eq!(c.step_mode, StepMode::Card);
        assert!(c.navigation_enabled);
        assert_eq!(c.confirm_key, KeyCode::Enter);
        Ok(())
    }

    #[test]
    fn overrides() -> Result<()> {
        let c = Config::from_toml(
            r#"
            step_mode = "byGroup"
            navigation_enabled = false
            confirm_key = "space"
            "#,
        )?;
        assert_eq!(c.step_mode, StepMode::Group);
        assert!(!c.navigation_enabled);
        assert_eq!(c.confirm_key, ' ');
        Ok(())
    }

    #[test]
    fn confirm_key_takes_no_modifiers() {
        for spec in ["ctrl+enter", "shift+enter", "alt+n"] {
            assert!(
                matches!(
                    Config::from_toml(&format!("confirm_key = \"{spec}\"")),
                    Err(Error::Config(_))
                ),
                "{spec} accepted"
            );
        }
    }

    #[test]
    fn rejects_unknown() {
        assert!(Config::from_toml("step_mode = \"page\"").is_err());
        assert!(Config::from_toml("colour = \"red\"").is_err());
        assert!(Config::from_toml("confirm_key = \"meta+q\"").is_err());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/stepform.toml")),
            Err(Error::Config(_))
        ));
    }
}
