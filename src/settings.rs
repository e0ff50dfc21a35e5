use crate::errors::{AppError, AppResult};
use crate::models::AppSettings;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.json";

impl AppSettings {
    pub fn load(app_data_dir: &Path) -> AppResult<Self> {
        let path = app_data_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|error| AppError::StorageUnavailable(format!("cannot read {}: {}", path.display(), error)))?;
        let settings: Self = serde_json::from_str(&raw)?;
        if settings.storage_file.trim().is_empty() {
            return Err(AppError::InvalidValue("storageFile must not be empty".to_string()));
        }
        Ok(settings)
    }

    pub fn save(&self, app_data_dir: &Path) -> AppResult<()> {
        fs::create_dir_all(app_data_dir).map_err(|error| {
            AppError::StorageUnavailable(format!("cannot create {}: {}", app_data_dir.display(), error))
        })?;
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(app_data_dir.join(SETTINGS_FILE), contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SETTINGS_FILE;
    use crate::errors::AppError;
    use crate::models::AppSettings;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = AppSettings::load(dir.path()).expect("settings");
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.storage_file, "metas.csv");
        assert!(settings.atomic_save);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"atomicSave": false}"#).expect("write");
        let settings = AppSettings::load(dir.path()).expect("settings");
        assert!(!settings.atomic_save);
        assert_eq!(settings.storage_file, "metas.csv");
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = AppSettings {
            storage_file: "goals.csv".to_string(),
            atomic_save: false,
        };
        settings.save(dir.path()).expect("save");
        assert_eq!(AppSettings::load(dir.path()).expect("load"), settings);
    }

    #[test]
    fn empty_storage_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"storageFile": "  "}"#).expect("write");
        assert!(matches!(AppSettings::load(dir.path()).unwrap_err(), AppError::InvalidValue(_)));
    }
}
