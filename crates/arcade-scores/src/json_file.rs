use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::{ScoreStore, ScoreStoreError, ScoreTable};

/// A [`ScoreStore`] backed by a JSON file.
///
/// The file is read once by [`Self::open`] and rewritten after every new
/// record. A missing file is an empty table. An unreadable or corrupt file
/// also starts from an empty table, with the failure kept in
/// [`Self::last_error`]; the store then keeps records in memory only and
/// never writes over that file. Write failures keep the new best in memory.
#[derive(Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
    table: ScoreTable,
    last_error: Option<ScoreStoreError>,
    memory_only: bool,
}

impl JsonScoreStore {
    #[must_use]
    pub fn open<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let (table, last_error) = match load(&path) {
            Ok(table) => (table, None),
            Err(e) => (ScoreTable::new(), Some(e)),
        };
        Self {
            path,
            table,
            memory_only: last_error.is_some(),
            last_error,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    /// Returns the most recent load or save failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&ScoreStoreError> {
        self.last_error.as_ref()
    }

    /// Returns `true` if the file could not be loaded, so records are not saved.
    #[must_use]
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    /// Writes the table to the file, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ScoreStoreError> {
        let io_error = |source| ScoreStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        let file = File::create(&self.path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.table).map_err(|source| {
            ScoreStoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        writeln!(writer).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }
}

fn load(path: &Path) -> Result<ScoreTable, ScoreStoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreTable::new()),
        Err(source) => {
            return Err(ScoreStoreError::Io {
                path: path.to_owned(),
                source,
            });
        }
    };
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ScoreStoreError::Json {
        path: path.to_owned(),
        source,
    })
}

impl ScoreStore for JsonScoreStore {
    fn best(&self, game_id: &str) -> u64 {
        self.table.best(game_id)
    }

    fn submit(&mut self, game_id: &str, score: u64) -> bool {
        if !self.table.record(game_id, score, Utc::now()) {
            return false;
        }
        if self.memory_only {
            return true;
        }
        if let Err(e) = self.save() {
            self.last_error = Some(e);
        }
        true
    }
}
