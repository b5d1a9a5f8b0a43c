//! Typed media library produced by the ZMDB reader
//!
//! These types are independent of the on-disk ZMDB layout: they are the
//! owning, materialized result of a parse, not a view into the input buffer.

mod album;
mod artist;
mod audiobook;
mod library;
mod picture;
mod playlist;
mod podcast;
mod track;
mod video;

pub use album::Album;
pub use artist::Artist;
pub use audiobook::AudiobookTrack;
pub use library::Library;
pub use picture::Picture;
pub use playlist::Playlist;
pub use podcast::PodcastEpisode;
pub use track::Track;
pub use video::Video;
