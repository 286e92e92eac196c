use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use lauread_core::{Chart, DecodedReplay, Ledger};

use crate::schema::model::ModelFile;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes a value's `Display` form verbatim.
    pub fn write_display<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: std::fmt::Display,
    {
        write!(&mut *self, "{value}")
            .with_context(|| format!("Failed to write to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

pub fn read_text_file<P>(file_kind: &str, path: P) -> anyhow::Result<String>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))
}

/// Read and parse a chart (`.osu`) file
pub fn read_chart_file<P>(path: P) -> anyhow::Result<Chart>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = read_text_file("chart", path)?;
    Chart::parse(&text).with_context(|| format!("Failed to parse chart file: {}", path.display()))
}

/// Read and parse a keystroke ledger (`.lauread`) file
pub fn read_ledger_file<P>(path: P) -> anyhow::Result<Ledger>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = read_text_file("ledger", path)?;
    Ledger::parse(&text).with_context(|| format!("Failed to parse ledger file: {}", path.display()))
}

pub fn read_replay_file<P>(path: P) -> anyhow::Result<DecodedReplay>
where
    P: AsRef<Path>,
{
    read_json_file("decoded replay", path)
}

/// Read an offset model file and check it matches this build's features
pub fn read_model_file<P>(path: P) -> anyhow::Result<ModelFile>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let model: ModelFile = read_json_file("model", path)?;
    model
        .check_features()
        .with_context(|| format!("Incompatible model file: {}", path.display()))?;
    Ok(model)
}

/// `<dir>/<stem of path>.<extension>`, or next to `path` when `dir` is `None`
pub fn sibling_path(path: &Path, dir: Option<&Path>, extension: &str) -> PathBuf {
    let renamed = path.with_extension(extension);
    match (dir, renamed.file_name()) {
        (Some(dir), Some(file_name)) => dir.join(file_name),
        _ => renamed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_path() {
        let chart = Path::new("charts/song [hard].osu");
        assert_eq!(
            sibling_path(chart, None, "writency"),
            PathBuf::from("charts/song [hard].writency")
        );
        assert_eq!(
            sibling_path(chart, Some(Path::new("out")), "writency"),
            PathBuf::from("out/song [hard].writency")
        );
    }

    #[test]
    fn test_read_chart_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.osu");
        fs::write(&path, "[HitObjects]\n36,192,100,1\n").unwrap();
        let err = read_chart_file(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("broken.osu"));
        assert!(message.contains("OverallDifficulty"));
    }
}
