use serde::{Deserialize, Serialize};

/// Artist metadata (schema `0x08`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub atom_id: u32,
    pub name: String,
    /// The `.art` filename reference
    pub filename: String,
    /// Present when the record carries tail field `0x14`
    pub guid: Option<String>,
}
