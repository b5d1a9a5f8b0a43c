use serde::{Deserialize, Serialize};

/// An audiobook track (schema `0x12`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudiobookTrack {
    pub atom_id: u32,
    pub title: String,
    /// Resolved from `title_ref` (schema `0x11`, AudiobookTitle)
    pub audiobook_name: String,
    pub author: String,
    pub filename: String,
    pub duration_ms: u32,
    pub playback_position_ms: u32,
    pub file_size_bytes: u32,
    pub track_number: u16,
    pub play_count: u16,
    /// e.g. `0x3009` (MP3) or `0xB901` (WMA)
    pub format_code: u16,
    pub last_played: u64,

    pub title_ref: u32,
    pub filename_ref: u32,
}
