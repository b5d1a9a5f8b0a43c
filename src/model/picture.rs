use serde::{Deserialize, Serialize};

/// A picture (schema `0x03`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub atom_id: u32,
    pub title: String,
    pub photo_album: String,
    pub user_album: String,
    pub collection: String,
    pub filename: String,
    pub timestamp: u64,
}
