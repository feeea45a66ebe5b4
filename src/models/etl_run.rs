use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EtlStatus {
    Running,
    Success,
    Failed,
}

impl EtlStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EtlStatus::Running => "running",
            EtlStatus::Success => "success",
            EtlStatus::Failed => "failed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "running" => Some(EtlStatus::Running),
            "success" => Some(EtlStatus::Success),
            "failed" => Some(EtlStatus::Failed),
            _ => None,
        }
    }
}

/// Audit record of one ingestion attempt (append-only).
#[derive(Debug, Clone, Serialize)]
pub struct EtlRun {
    pub id: i64,
    pub year: i32,
    pub run_date: String, // ISO8601, local time
    pub status: EtlStatus,
    pub records_processed: usize,
    pub duration_seconds: Option<f64>,
    pub message: String,
}
