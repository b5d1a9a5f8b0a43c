use serde::{Deserialize, Serialize};

/// A video (schema `0x02`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub atom_id: u32,
    pub title: String,
    pub folder: String,
    pub codec_id: u32,
    pub file_size_bytes: u32,
    pub filename: String,
    /// Reference field at offset 8; purpose undocumented (spec §9 open
    /// question), carried through opaque
    pub ref2: u32,
}
