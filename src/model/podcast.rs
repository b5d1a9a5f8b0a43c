use serde::{Deserialize, Serialize};

/// A podcast episode (schema `0x10`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastEpisode {
    pub atom_id: u32,
    pub title: String,
    pub show_name: String,
    pub author: String,
    pub description: String,
    pub audio_url: String,
    pub rss_url: String,
    pub duration_ms: u32,
    pub timestamp: u64,
    pub file_size_bytes: u32,
    pub codec_id: u16,
    /// Reference field at offset 12; purpose undocumented (spec §9 open
    /// question), carried through opaque
    pub ref3: u32,
}
