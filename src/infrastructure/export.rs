use crate::domain::FeedbackRecord;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRow<'a> {
    id: u32,
    patient_id: &'a str,
    patient_name: &'a str,
    therapy: &'static str,
    date: String,
    comfort_rating: u8,
    side_effects: String,
    relief_signs: String,
    notes: &'a str,
    status: &'static str,
}

impl<'a> From<&'a FeedbackRecord> for FeedbackRow<'a> {
    fn from(record: &'a FeedbackRecord) -> Self {
        Self {
            id: record.id,
            patient_id: &record.patient_id,
            patient_name: &record.patient_name,
            therapy: record.therapy.label(),
            date: record.date.format("%Y-%m-%d").to_string(),
            comfort_rating: record.comfort_rating,
            side_effects: record.side_effects.join("; "),
            relief_signs: record.relief_signs.join("; "),
            notes: &record.notes,
            status: record.status.label(),
        }
    }
}

pub struct FeedbackCsvExporter;

impl FeedbackCsvExporter {
    /// Writes one header row plus one row per record; list cells are `; ` joined.
    pub fn write<W: io::Write>(records: &[FeedbackRecord], writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in records {
            csv_writer.serialize(FeedbackRow::from(record))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn export_to_file(records: &[FeedbackRecord], path: &Path) -> Result<PathBuf, ExportError> {
        let file = std::fs::File::create(path)?;
        Self::write(records, file)?;
        Ok(path.to_path_buf())
    }
}
