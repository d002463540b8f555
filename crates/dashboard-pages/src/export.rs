//! Export files built from a page's current view

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dashboard_core::Result;
use dashboard_protocol::export::render;
use dashboard_protocol::{CsvRow, ExportFormat, export_filename};
use serde::Serialize;
use tracing::info;

/// A rendered export ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// `<entity>-export-<YYYY-MM-DD>.<ext>`
    pub filename: String,
    /// Encoding
    pub format: ExportFormat,
    /// File contents
    pub contents: String,
}

impl ExportFile {
    /// Render `records` for `entity`
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be serialized.
    pub fn build<'a, R, I>(
        entity: &str,
        records: I,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<Self>
    where
        R: CsvRow + Serialize + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        Ok(Self {
            filename: export_filename(entity, now, format),
            format,
            contents: render(records, format)?,
        })
    }

    /// Media type of the contents
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Save into `directory`, creating it when missing
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn write_to(&self, directory: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(directory).await?;
        let path = directory.join(&self.filename);
        tokio::fs::write(&path, self.contents.as_bytes()).await?;
        info!(
            path = %path.display(),
            bytes = self.contents.len(),
            "Export written"
        );
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dashboard_core::seed;
    use dashboard_core::types::Idea;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_write_to_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 12, 24, 12, 0, 0).unwrap();
        let ideas = seed::ideas();

        let file = ExportFile::build("feedback", &ideas, ExportFormat::Json, now).unwrap();
        assert_eq!(file.filename, "feedback-export-2024-12-24.json");
        assert_eq!(file.mime_type(), "application/json");

        let path = file.write_to(&dir.path().join("nested")).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Vec<Idea> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, ideas);
    }
}
