//! Reading and writing shader sources and project files.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use super::model::Document;
use crate::codec;
use crate::error::DecodeError;

/// Extension given to saved projects.
pub const PROJECT_EXTENSION: &str = "bulin";

/// `file` with the project extension, replacing any other extension.
pub fn project_path(file: &str) -> String {
    Path::new(file)
        .with_extension(PROJECT_EXTENSION)
        .to_string_lossy()
        .into_owned()
}

pub async fn read_shader(path: &str) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read shader '{path}'"))
}

pub async fn write_shader(path: &str, text: &str) -> anyhow::Result<()> {
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write shader '{path}'"))
}

pub async fn read_project(path: &str) -> anyhow::Result<Document> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read project '{path}'"))?;
    codec::decode(&bytes).with_context(|| format!("Failed to load project '{path}'"))
}

pub async fn write_project(path: &str, doc: &Document) -> anyhow::Result<()> {
    let bytes = codec::encode(doc)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write project '{path}'"))
}

/// Blocking load used at startup, before the store exists.
pub fn load_project(path: &Path) -> Result<Document, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    codec::decode(&bytes)
}
