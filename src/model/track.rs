use serde::{Deserialize, Serialize};

/// A music track (schema `0x01`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// This record's atom-id
    pub atom_id: u32,

    pub title: String,
    pub artist_name: String,
    /// Artist GUID, when the artist record carried field `0x14`
    pub artist_guid: Option<String>,

    pub album_name: String,
    pub album_artist_name: String,
    pub album_artist_guid: Option<String>,
    pub genre: String,

    /// Disc number; defaults to 1 when absent (HD tail field `0x6c`, not
    /// stored at all on Classic)
    pub disc_number: u8,
    pub track_number: u32,
    pub duration_ms: i32,
    pub file_size_bytes: i32,
    pub play_count: u16,
    pub skip_count: u16,
    pub codec_id: u16,
    pub rating: u8,
    /// Windows FILETIME of the last play/skip event; 0 when absent
    pub last_played: u64,

    /// Atom-id of the album this track belongs to (0 if none)
    pub album_ref: u32,
    pub filename: String,
}
