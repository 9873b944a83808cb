use std::{fs, path::PathBuf};

use chrono::NaiveDateTime;
use circuit_domain::StorageError;
use log::info;

use crate::{File, FileStore, file::unavailable};

impl FileStore {
    /// Copy all existing data files into `backup/<timestamp>` inside the data directory.
    ///
    /// Returns `None` if there is nothing to back up yet.
    pub fn backup(&self, timestamp: NaiveDateTime) -> Result<Option<PathBuf>, StorageError> {
        let files = File::iter()
            .map(|file| self.path(*file))
            .filter(|path| path.exists())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Ok(None);
        }

        let target = self
            .dir()
            .join("backup")
            .join(timestamp.format("%Y%m%d_%H%M%S").to_string());
        fs::create_dir_all(&target).map_err(|err| unavailable(&target, &err))?;

        for path in files {
            if let Some(name) = path.file_name() {
                let destination = target.join(name);
                fs::copy(&path, &destination).map_err(|err| unavailable(&destination, &err))?;
            }
        }

        info!("data backed up to {}", target.display());

        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use circuit_domain::{ExerciseRepository, SessionRepository};
    use pretty_assertions::assert_eq;

    use crate::tests::data::{EXERCISES, SESSION, store};

    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_backup() {
        let (_dir, store) = store();
        store.create_exercises(EXERCISES.clone()).unwrap();
        store.write_session(&"a".into(), &SESSION).unwrap();

        let target = store.backup(timestamp()).unwrap().unwrap();

        assert_eq!(target, store.dir().join("backup").join("20240301_080509"));
        assert_eq!(
            FileStore::new(&target).read_exercises().unwrap(),
            EXERCISES.clone()
        );
        assert_eq!(
            FileStore::new(&target).read_session(&"a".into()).unwrap(),
            Some(SESSION.clone())
        );
        assert!(!target.join("workouts.json").exists());
    }

    #[test]
    fn test_backup_without_data() {
        let (_dir, store) = store();

        assert_eq!(store.backup(timestamp()).unwrap(), None);
        assert!(!store.dir().join("backup").exists());
    }
}
