//! Common test utilities for riffscope integration tests
//!
//! Builders for RIFF records and WAV files, plus helpers for putting the
//! same bytes behind every slice backing.

#![allow(dead_code)]

use riffscope_lib::io::{BoxedSlice, BufferSlice, FileSlice, ViewSlice};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

// ============================================================================
// Record Builders
// ============================================================================

/// A record with a little-endian size, as found inside RIFF lists
pub fn le_chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// A record with a big-endian size, as read by the sequential chunk reader
pub fn be_chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Payload of a container: the list type followed by the child records
pub fn list_payload(list_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let mut out = list_type.to_vec();
    for child in children {
        out.extend_from_slice(child);
    }
    out
}

/// A little-endian container record (`RIFF` or `LIST`)
pub fn le_list(tag: &[u8; 4], list_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    le_chunk(tag, &list_payload(list_type, children))
}

// ============================================================================
// WAV Generation
// ============================================================================

/// 16-bit PCM `fmt ` payload
pub fn pcm_format(channels: u16, sample_rate: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * block_align as u32;

    let mut fmt = Vec::with_capacity(16);
    fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
    fmt.extend_from_slice(&channels.to_le_bytes());
    fmt.extend_from_slice(&sample_rate.to_le_bytes());
    fmt.extend_from_slice(&byte_rate.to_le_bytes());
    fmt.extend_from_slice(&block_align.to_le_bytes());
    fmt.extend_from_slice(&bits_per_sample.to_le_bytes());
    fmt
}

/// Mono 16-bit samples forming a simple ramp
pub fn pcm_samples(count: usize) -> Vec<u8> {
    (0..count)
        .flat_map(|i| ((i as i16).wrapping_mul(64)).to_le_bytes())
        .collect()
}

/// A complete WAV file: `fmt `, `data` and a `LIST`/`INFO` block naming it
pub fn create_wav_bytes(samples: usize, name: &str) -> Vec<u8> {
    let mut name = name.as_bytes().to_vec();
    if name.len() % 2 == 1 {
        name.push(0);
    }
    let info = le_list(b"LIST", b"INFO", &[le_chunk(b"INAM", &name)]);

    le_list(
        b"RIFF",
        b"WAVE",
        &[
            le_chunk(b"fmt ", &pcm_format(1, 8000)),
            le_chunk(b"data", &pcm_samples(samples)),
            info,
        ],
    )
}

// ============================================================================
// Files and Backings
// ============================================================================

/// Write `data` to a fresh temporary file
pub fn temp_file_with(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(data).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// The same bytes behind each backing, labelled for assertion messages
///
/// The temp file must outlive the returned slices.
pub fn all_backings(data: &[u8]) -> (Vec<(&'static str, BoxedSlice)>, NamedTempFile) {
    let temp = temp_file_with(data);
    let file = FileSlice::open(temp.path()).expect("Failed to open temp file");

    let mut padded = vec![0xEE; 3];
    padded.extend_from_slice(data);
    padded.extend_from_slice(&[0xEE; 5]);
    let view = ViewSlice::over(
        Arc::new(BufferSlice::from_vec(padded)),
        3,
        data.len() as u64,
    )
    .expect("Failed to create view");

    let backings: Vec<(&'static str, BoxedSlice)> = vec![
        ("buffer", Box::new(BufferSlice::from_vec(data.to_vec()))),
        ("file", Box::new(file)),
        ("view", Box::new(view)),
    ];
    (backings, temp)
}
