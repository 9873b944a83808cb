use std::collections::VecDeque;

use circuit_web_app::{Settings, SettingsRepository, log};

use crate::{File, FileStore};

impl SettingsRepository for FileStore {
    fn read_settings(&self) -> Result<Settings, String> {
        self.read(File::Settings).map_err(|err| err.to_string())
    }

    fn write_settings(&self, settings: Settings) -> Result<(), String> {
        self.write(File::Settings, &settings)
            .map_err(|err| err.to_string())
    }
}

impl log::Repository for FileStore {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.read(File::Log)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::MAX_ENTRIES);
        self.write(File::Log, &entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
