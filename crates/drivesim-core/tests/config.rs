//! Tests for configuration persistence

#[cfg(test)]
mod tests {
    use drivesim_core::config::{ConfigError, DashboardConfig};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = DashboardConfig::default();
        config.transport.address = "10.0.0.5:9000".to_string();
        config.smoothing.speed_tween_ms = 250;
        config.save(&path).unwrap();

        let loaded = DashboardConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"gauge": {"max_speed_kmh": 240}}"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.gauge.max_speed_kmh, 240.0);
        assert_eq!(config.gauge.stroke_length, 615.0);
        assert_eq!(config.smoothing.tick_interval_ms, 16);
    }

    #[test]
    fn test_bad_files_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));

        fs::write(&path, r#"{"smoothing": {"tick_interval_ms": 0}}"#).unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
