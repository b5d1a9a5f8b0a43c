use serde::{Deserialize, Serialize};

/// Album metadata (schema `0x06`)
///
/// Albums are not swept as standalone library entries; they are populated
/// as a side effect of resolving `album_ref` while parsing tracks, keyed by
/// atom-id in [`super::Library::albums`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub atom_id: u32,
    pub title: String,
    pub artist_name: String,
    pub artist_guid: Option<String>,

    /// `0x06000000 | (atom_id & 0x00FFFFFF)`
    pub album_pid: u32,

    /// The `.alb` filename, equal to the upload subsystem's
    /// `ObjectFileName` for the matching album (see spec §6.4)
    pub alb_reference: String,

    /// Atom-id of the artist this album belongs to (0 if none)
    pub artist_ref: u32,
}
