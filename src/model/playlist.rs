use serde::{Deserialize, Serialize};

/// A playlist (schema `0x07`)
///
/// Member tracks are stored as atom-ids, not resolved `Track` values. The
/// legacy HD reader resolved full tracks inline; this is treated as a
/// legacy accident (spec §9) and both families now store atom-ids, leaving
/// lazy resolution to the consumer via [`super::Library::track`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub atom_id: u32,
    pub name: String,
    pub filename: String,
    pub guid: Option<String>,
    pub folder: String,
    pub track_atom_ids: Vec<u32>,
}
