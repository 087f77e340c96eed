use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Destination of a command's JSON result.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>, PathBuf),
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match path {
            Some(path) => Self::create(path)?,
            None => Output::Stdout(io::stdout().lock()),
        };
        output
            .write_json(value)
            .with_context(|| format!("Failed to write JSON to {}", output.describe()))?;
        eprintln!("Saved JSON to {}", output.describe());
        Ok(())
    }

    fn create(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File(BufWriter::new(file), path))
    }

    fn describe(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File(_, path) => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> io::Result<()>
    where
        T: serde::Serialize,
    {
        let writer: &mut dyn io::Write = match self {
            Output::Stdout(stdout) => stdout,
            Output::File(file, _) => file,
        };
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}

/// Reads a JSON file; `file_kind` names the file in error messages.
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_save_json_creates_directories() {
        let dir = env::temp_dir().join(format!("arcade-cli-util-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("out.json");

        Output::save_json(&serde_json::json!({ "pieces": 3 }), Some(path.clone())).unwrap();

        let value: serde_json::Value = read_json_file("test", &path).unwrap();
        assert_eq!(value["pieces"], 3);
        assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
    }

    #[test]
    fn test_read_json_file_errors_name_the_file() {
        let missing = env::temp_dir().join("arcade-cli-util-missing.json");
        let err = read_json_file::<serde_json::Value, _>("config", &missing).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open config file"));
    }
}
