//! Owned, printable snapshots of chunk trees

use super::Chunk;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Plain description of a chunk and its children
///
/// Holds no slices, so it outlives the source it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub tag: String,
    /// Payload size in bytes, 0 if the payload could not be read
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChunkSummary>,
}

impl ChunkSummary {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        ChunkSummary {
            tag: chunk.tag().to_string(),
            size: chunk.size().unwrap_or(0),
            list_type: chunk.list_type().map(|t| t.to_string()),
            children: chunk.children().iter().map(ChunkSummary::from_chunk).collect(),
        }
    }

    /// Total number of chunks in this subtree, itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ChunkSummary::count).sum::<usize>()
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::invalid_input(format!("JSON serialization failed: {}", e)))
    }

    /// Serialize to single-line JSON
    pub fn to_json_compact(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::invalid_input(format!("JSON serialization failed: {}", e)))
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.tag, indent = depth * 2)?;
        if let Some(list_type) = &self.list_type {
            write!(f, " [{}]", list_type)?;
        }
        writeln!(f, " ({} bytes)", self.size)?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl From<&Chunk> for ChunkSummary {
    fn from(chunk: &Chunk) -> Self {
        ChunkSummary::from_chunk(chunk)
    }
}

impl fmt::Display for ChunkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
