//! Saved analyses, scoped by user id.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const UNTITLED_VIDEO: &str = "Untitled Video";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Invalid(String),

    #[error("Analysis not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: analysis {0} belongs to another user")]
    Forbidden(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timestamp error: {0}")]
    Time(#[from] time::error::Format),
}

impl StoreError {
    pub fn status(&self) -> u16 {
        match self {
            StoreError::Invalid(_) => 400,
            StoreError::Forbidden(_) => 403,
            StoreError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub video_id: String,
    pub video_title: String,
    pub analysis: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Analysis {
    fn created(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.created_at, &Rfc3339).ok()
    }
}

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub video_id: String,
    pub video_title: Option<String>,
    pub analysis: String,
}

pub trait AnalysisRepository {
    fn create(&self, user_id: &str, new: NewAnalysis) -> Result<Analysis>;

    /// All analyses of `user_id`, newest first
    fn list(&self, user_id: &str) -> Result<Vec<Analysis>>;

    fn get(&self, user_id: &str, id: &str) -> Result<Analysis>;

    fn update(&self, user_id: &str, id: &str, analysis: &str) -> Result<Analysis>;

    fn delete(&self, user_id: &str, id: &str) -> Result<()>;
}

/// All analyses kept in one JSON array on disk
pub struct JsonFileStore {
    path: PathBuf,
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytlens")
        .join("analyses.json")
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Analysis>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write_all(&self, records: &[Analysis]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(records)?)?;
        debug!("Wrote {} analyses to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Index of `id`, after checking it belongs to `user_id`
    fn position(records: &[Analysis], user_id: &str, id: &str) -> Result<usize> {
        let idx = records
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if records[idx].user_id != user_id {
            return Err(StoreError::Forbidden(id.to_string()));
        }
        Ok(idx)
    }
}

fn now() -> Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

impl AnalysisRepository for JsonFileStore {
    fn create(&self, user_id: &str, new: NewAnalysis) -> Result<Analysis> {
        if new.video_id.trim().is_empty() || new.analysis.trim().is_empty() {
            return Err(StoreError::Invalid("VideoId and analysis are required".to_string()));
        }

        let stamp = now()?;
        let record = Analysis {
            id: uuid::Uuid::new_v4().to_string(),
            video_id: new.video_id,
            video_title: new
                .video_title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED_VIDEO.to_string()),
            analysis: new.analysis,
            user_id: user_id.to_string(),
            created_at: stamp.clone(),
            updated_at: stamp,
        };

        let mut records = self.read_all()?;
        records.push(record.clone());
        self.write_all(&records)?;
        info!("Saved analysis {} for user {user_id}", record.id);
        Ok(record)
    }

    fn list(&self, user_id: &str) -> Result<Vec<Analysis>> {
        let mut mine: Vec<Analysis> = self
            .read_all()?
            .into_iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.created().cmp(&a.created()));
        debug!("Found {} analyses for user {user_id}", mine.len());
        Ok(mine)
    }

    fn get(&self, user_id: &str, id: &str) -> Result<Analysis> {
        let records = self.read_all()?;
        let idx = Self::position(&records, user_id, id)?;
        Ok(records[idx].clone())
    }

    fn update(&self, user_id: &str, id: &str, analysis: &str) -> Result<Analysis> {
        if analysis.trim().is_empty() {
            return Err(StoreError::Invalid("Analysis content is required".to_string()));
        }

        let mut records = self.read_all()?;
        let idx = Self::position(&records, user_id, id)?;
        records[idx].analysis = analysis.to_string();
        records[idx].updated_at = now()?;
        self.write_all(&records)?;
        info!("Updated analysis {id}");
        Ok(records[idx].clone())
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let mut records = self.read_all()?;
        let idx = Self::position(&records, user_id, id)?;
        records.remove(idx);
        self.write_all(&records)?;
        info!("Deleted analysis {id}");
        Ok(())
    }
}
