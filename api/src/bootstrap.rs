use crate::{
    config::Config,
    store::{Database, JsonFileStore, StoreError, StoreResult},
};
use std::fs;
use tracing::{info, warn};

/// Opens the JSON database named by the config, creating it when missing.
///
/// With `reset_on_start` the existing file is wiped first.
pub fn open_database(config: &Config) -> StoreResult<Database> {
    if let Some(parent) = config
        .db_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let db = Database::new(JsonFileStore::new(&config.db_path));
    if config.reset_on_start {
        warn!(path = %config.db_path.display(), "debug reset: wiping database");
        db.reset()?;
    }

    let snapshot = db.read()?;
    info!(
        path = %config.db_path.display(),
        users = snapshot.users.len(),
        chirps = snapshot.chirps.len(),
        "database ready"
    );
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::UserRepository;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir, reset: &str) -> Config {
        let db_path = dir.path().join("nested").join("database.json");
        let db_path = db_path.to_string_lossy().into_owned();
        Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("s".into()),
            "POLKA_KEY" => Some("k".into()),
            "DB_PATH" => Some(db_path.clone()),
            "DEBUG_RESET_ON_START" => Some(reset.into()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn creates_missing_file_and_directories() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "false");

        open_database(&config).unwrap();
        assert!(config.db_path.exists());
    }

    #[test]
    fn keeps_data_unless_reset_requested() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "false");
        let db = open_database(&config).unwrap();
        UserRepository::new(db).create("a@b.com", "hash").unwrap();

        let reopened = open_database(&config).unwrap();
        assert_eq!(reopened.read().unwrap().users.len(), 1);

        let wiped = open_database(&config_for(&dir, "true")).unwrap();
        assert!(wiped.read().unwrap().users.is_empty());
    }
}
