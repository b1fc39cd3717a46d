use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::color::Color;
use crate::error::{LineaError, LineaResult};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            width: 1920,
            height: 1080,
            background: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StyleConfig {
    pub color: String,
    pub stroke_width: f64,
    pub font_size: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".to_string(),
            stroke_width: 4.0,
            font_size: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BindingConfig {
    /// Reject a second binding on an already bound slot instead of letting
    /// the later registration win.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct LineaConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub binding: BindingConfig,
}

impl LineaConfig {
    pub fn load_from_file(path: &std::path::Path) -> LineaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> LineaResult<Self> {
        let config: LineaConfig =
            toml::from_str(contents).map_err(|e| LineaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> LineaResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| LineaError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> LineaResult<()> {
        if !(self.render.fps.is_finite() && self.render.fps > 0.0) {
            return Err(LineaError::Config(format!(
                "render.fps must be positive, got {}",
                self.render.fps
            )));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(LineaError::Config("render resolution must be non-zero".into()));
        }
        if self.style.stroke_width < 0.0 {
            return Err(LineaError::Config("style.stroke_width must not be negative".into()));
        }
        self.background()?;
        self.default_color()?;
        Ok(())
    }

    pub fn background(&self) -> LineaResult<Color> {
        Color::from_hex(&self.render.background).map_err(|e| LineaError::Config(e.to_string()))
    }

    pub fn default_color(&self) -> LineaResult<Color> {
        Color::from_hex(&self.style.color).map_err(|e| LineaError::Config(e.to_string()))
    }
}

static GLOBAL: OnceLock<LineaConfig> = OnceLock::new();

/// Install the process-wide configuration. Allowed once; installing the same
/// value again is a no-op, a different value is rejected.
pub fn install(config: LineaConfig) -> LineaResult<&'static LineaConfig> {
    config.validate()?;
    let installed = GLOBAL.get_or_init(|| config.clone());
    if *installed != config {
        return Err(LineaError::Config(
            "global configuration is already installed and cannot change during a run".into(),
        ));
    }
    tracing::debug!(fps = installed.render.fps, "installed global configuration");
    Ok(installed)
}

/// The installed configuration, or the defaults if nothing was installed.
pub fn global() -> &'static LineaConfig {
    static DEFAULT: OnceLock<LineaConfig> = OnceLock::new();
    GLOBAL
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(LineaConfig::default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg = LineaConfig::from_toml("[render]\nfps = 60.0\n").unwrap();
        assert_eq!(cfg.render.fps, 60.0);
        assert_eq!(cfg.render.width, 1920);
        assert!(!cfg.binding.strict);
        assert_eq!(cfg.style, StyleConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(LineaConfig::from_toml("[render]\nfps = 0.0\n").is_err());
        assert!(LineaConfig::from_toml("[render]\nbackground = \"nope\"\n").is_err());
        assert!(LineaConfig::from_toml("[binding]\nstrict = \"yes\"\n").is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("linea-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("linea.toml");

        let mut cfg = LineaConfig::default();
        cfg.binding.strict = true;
        cfg.render.fps = 24.0;
        cfg.save_to_file(&path).unwrap();

        let loaded = LineaConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_global_falls_back_to_defaults() {
        // Nothing in this test binary installs a configuration.
        assert!(global().render.fps > 0.0);
    }
}
