use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;

use crate::Transcript;

pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("ytlens")
        .join("transcripts")
}

fn cache_path(dir: &Path, video_id: &str) -> PathBuf {
    dir.join(format!("{video_id}.json"))
}

/// Load a cached transcript, if available.
pub fn load(dir: &Path, video_id: &str) -> Option<Transcript> {
    let path = cache_path(dir, video_id);
    let data = std::fs::read_to_string(&path).ok()?;
    let transcript: Transcript = serde_json::from_str(&data).ok()?;
    if transcript.segments.is_empty() {
        return None;
    }
    debug!("Cache hit: {}", path.display());
    Some(transcript)
}

/// Save a transcript to the cache.
pub fn save(dir: &Path, transcript: &Transcript) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = cache_path(dir, &transcript.video_id);
    let data = serde_json::to_string_pretty(transcript)?;
    std::fs::write(&path, data)?;
    debug!("Cached transcript: {}", path.display());
    Ok(())
}
