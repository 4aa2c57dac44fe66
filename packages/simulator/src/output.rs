//! Output writers for simulation results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::metrics::{CsvSummaryRow, GameMetrics};
use crate::types::OutputFormat;

/// Writes one JSON document per session (JSONL, optionally gzipped) or a
/// single JSON array, plus a CSV summary row per session.
pub struct OutputWriter {
    format: OutputFormat,
    detail_writer: Box<dyn Write + Send>,
    csv_writer: csv::Writer<BufWriter<File>>,
    detail_path: PathBuf,
    csv_path: PathBuf,
    written: usize,
}

impl OutputWriter {
    pub fn new(
        output_dir: &Path,
        format: OutputFormat,
        compress: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(output_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let extension = match format {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
        };
        let mut detail_path = output_dir.join(format!("simulation_{timestamp}.{extension}"));
        let detail_writer: Box<dyn Write + Send> = if compress {
            detail_path = output_dir.join(format!("simulation_{timestamp}.{extension}.gz"));
            Box::new(BufWriter::new(GzEncoder::new(
                File::create(&detail_path)?,
                Compression::default(),
            )))
        } else {
            Box::new(BufWriter::new(File::create(&detail_path)?))
        };

        let csv_path = output_dir.join(format!("simulation_{timestamp}_summary.csv"));
        let csv_writer = csv::Writer::from_writer(BufWriter::new(File::create(&csv_path)?));

        let mut writer = Self {
            format,
            detail_writer,
            csv_writer,
            detail_path,
            csv_path,
            written: 0,
        };
        if matches!(writer.format, OutputFormat::Json) {
            writer.detail_writer.write_all(b"[\n")?;
        }
        Ok(writer)
    }

    pub fn write_game(&mut self, metrics: &GameMetrics) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(metrics)?;
        match self.format {
            OutputFormat::Jsonl => writeln!(self.detail_writer, "{json}")?,
            OutputFormat::Json => {
                if self.written > 0 {
                    self.detail_writer.write_all(b",\n")?;
                }
                self.detail_writer.write_all(json.as_bytes())?;
            }
        }

        let row: CsvSummaryRow = metrics.into();
        self.csv_writer.serialize(&row)?;
        self.written += 1;
        Ok(())
    }

    /// Flush everything; the gzip trailer is written when the writer drops.
    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        if matches!(self.format, OutputFormat::Json) {
            self.detail_writer.write_all(b"\n]\n")?;
        }
        self.detail_writer.flush()?;
        self.csv_writer.flush()?;
        Ok(())
    }

    pub fn output_paths(&self) -> (&Path, &Path) {
        (&self.detail_path, &self.csv_path)
    }
}
