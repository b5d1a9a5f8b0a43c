//! Reader for the Zune ZMDB media catalog format
//!
//! ZMDB is the on-device database both Zune Classic and Zune HD devices
//! use to catalog synced media. This crate parses that binary format
//! into a typed [`model::Library`] without touching a real device:
//! give it the bytes of a `ZuneMediaDatabase` file and a [`DeviceFamily`]
//! and it hands back every track, video, picture, playlist, podcast
//! episode and audiobook track it can recover.

pub mod model;
mod zmdb;

pub use zmdb::{detect_family, parse, DeviceFamily};
