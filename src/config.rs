use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;

use aster_core::EngineConfig;

/// Loads the engine configuration from a TOML file, falling back to the
/// built-in defaults when the file does not exist. Any value present in the
/// file overrides its default.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<EngineConfig> {
    let path = path.as_ref();
    let config: EngineConfig = if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
    } else {
        info!("no config file at {}, using defaults", path.display());
        EngineConfig::default()
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use aster_core::EngineConfig;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: EngineConfig = toml::from_str("target_fps = 60\nvsync = false\n").unwrap();
        assert_eq!(config.target_fps, 60);
        assert!(!config.vsync);
        assert_eq!(config.target_ups, 30);
        assert_eq!(config.fov_degrees, 60.0);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let config: EngineConfig = toml::from_str("z_near = -1.0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
