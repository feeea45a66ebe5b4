use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Excel,
}

impl FileKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Excel => "excel",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(FileKind::Csv),
            "excel" => Some(FileKind::Excel),
            _ => None,
        }
    }

    /// Guess the kind from the file extension (xlsx/xlsm/xls/ods → Excel).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(FileKind::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(FileKind::Excel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl UploadStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Processing => "processing",
            UploadStatus::Success => "success",
            UploadStatus::Failed => "failed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(UploadStatus::Pending),
            "processing" => Some(UploadStatus::Processing),
            "success" => Some(UploadStatus::Success),
            "failed" => Some(UploadStatus::Failed),
            _ => None,
        }
    }
}

/// Metadata of a source file handed in for import.
#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    pub id: i64,
    pub file_path: String,
    pub file_kind: FileKind,
    pub year: i32,
    pub uploaded_at: String,
    pub status: UploadStatus,
    pub records_processed: usize,
    pub error_message: String,
    pub processing_time: Option<f64>,
    /// When set, facts of every other year are dropped too.
    /// The declared year itself is always replaced.
    pub replace_all_years: bool,
}

impl Upload {
    pub fn file_name(&self) -> String {
        Path::new(&self.file_path)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
