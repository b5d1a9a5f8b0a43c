//! Device-family dispatch
//!
//! The two Zune hardware generations agree on the container format (magic
//! tags, descriptor table, backwards-varint tail encoding) but disagree on
//! which descriptor slot holds which entity, and on a handful of
//! fixed-prefix field offsets. Rather than modeling `HD` and `Classic` as
//! separate parser types, each is a `FamilyLayout` value consulted by the
//! same parsing code, per a single set of schema-parsing methods
//! parameterized by family rather than duplicated per family.

use super::schema::SchemaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    Classic,
    Hd,
}

impl DeviceFamily {
    /// Classify a device-family from the header's version field
    /// (spec §3.2: 2 = Classic, 5 = HD).
    pub fn from_version(version: u32) -> Option<Self> {
        match version {
            2 => Some(Self::Classic),
            5 => Some(Self::Hd),
            _ => None,
        }
    }

    pub fn layout(self) -> FamilyLayout {
        match self {
            Self::Classic => FamilyLayout::classic(),
            Self::Hd => FamilyLayout::hd(),
        }
    }
}

/// Which descriptor table slot holds a given schema's entries, and the
/// family-specific fixed-prefix offsets needed to parse it.
#[derive(Debug, Clone, Copy)]
pub struct FamilyLayout {
    descriptor_map: [(usize, SchemaKind); 15],

    /// Offsets into the Music fixed prefix, spec §3.6/§9.
    pub music_album_ref: usize,
    pub music_artist_ref: usize,
    pub music_genre_ref: usize,
    pub music_filename_ref: usize,
    pub music_duration: usize,
    pub music_file_size: usize,
    pub music_title: usize,

    /// Offset of the Album title string within its fixed prefix; the
    /// families disagree here (HD: 20, Classic: 12).
    pub album_title_offset: usize,
    /// Offset of the Artist name string within its fixed prefix (HD: 4,
    /// Classic: 1).
    pub artist_name_offset: usize,

    /// Offset of the UTF-8 text in PhotoAlbum/Collection records (HD: 12,
    /// Classic: 4, spec §4.8).
    pub photo_collection_text_offset: usize,
}

impl FamilyLayout {
    pub fn schema_for_descriptor(&self, index: usize) -> Option<SchemaKind> {
        self.descriptor_map
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, kind)| *kind)
    }

    pub fn descriptor_for_schema(&self, kind: SchemaKind) -> Option<usize> {
        self.descriptor_map
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(i, _)| *i)
    }

    pub fn swept_descriptors(&self) -> impl Iterator<Item = (usize, SchemaKind)> + '_ {
        self.descriptor_map.iter().copied()
    }

    fn hd() -> Self {
        Self {
            descriptor_map: [
                (1, SchemaKind::Music),
                (12, SchemaKind::Video),
                (16, SchemaKind::Picture),
                (5, SchemaKind::Filename),
                (6, SchemaKind::Album),
                (11, SchemaKind::Playlist),
                (8, SchemaKind::Artist),
                (9, SchemaKind::Genre),
                (10, SchemaKind::VideoTitle),
                (13, SchemaKind::PhotoAlbum),
                (14, SchemaKind::Collection),
                (15, SchemaKind::PodcastShow),
                (19, SchemaKind::PodcastEpisode),
                (25, SchemaKind::AudiobookTitle),
                (26, SchemaKind::AudiobookTrack),
            ],
            music_album_ref: 0,
            music_artist_ref: 4,
            music_genre_ref: 8,
            music_filename_ref: 12,
            music_duration: 16,
            music_file_size: 20,
            music_title: 32,
            album_title_offset: 20,
            artist_name_offset: 4,
            photo_collection_text_offset: 12,
        }
    }

    fn classic() -> Self {
        Self {
            descriptor_map: [
                (1, SchemaKind::Music),
                (12, SchemaKind::Video),
                (16, SchemaKind::Picture),
                (5, SchemaKind::Filename),
                (6, SchemaKind::Album),
                (2, SchemaKind::Playlist),
                (8, SchemaKind::Artist),
                (9, SchemaKind::Genre),
                (10, SchemaKind::VideoTitle),
                (13, SchemaKind::PhotoAlbum),
                (14, SchemaKind::Collection),
                (15, SchemaKind::PodcastShow),
                (19, SchemaKind::PodcastEpisode),
                (25, SchemaKind::AudiobookTitle),
                (27, SchemaKind::AudiobookTrack),
            ],
            music_album_ref: 0,
            music_artist_ref: 4,
            music_genre_ref: 8,
            music_filename_ref: 12,
            music_duration: 16,
            music_file_size: 20,
            music_title: 28,
            album_title_offset: 12,
            artist_name_offset: 1,
            photo_collection_text_offset: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_descriptor_differs_by_family() {
        assert_eq!(
            DeviceFamily::Hd
                .layout()
                .descriptor_for_schema(SchemaKind::Playlist),
            Some(11)
        );
        assert_eq!(
            DeviceFamily::Classic
                .layout()
                .descriptor_for_schema(SchemaKind::Playlist),
            Some(2)
        );
    }

    #[test]
    fn audiobook_track_descriptor_differs_by_family() {
        assert_eq!(
            DeviceFamily::Hd
                .layout()
                .descriptor_for_schema(SchemaKind::AudiobookTrack),
            Some(26)
        );
        assert_eq!(
            DeviceFamily::Classic
                .layout()
                .descriptor_for_schema(SchemaKind::AudiobookTrack),
            Some(27)
        );
    }

    #[test]
    fn family_from_version() {
        assert_eq!(DeviceFamily::from_version(2), Some(DeviceFamily::Classic));
        assert_eq!(DeviceFamily::from_version(5), Some(DeviceFamily::Hd));
        assert_eq!(DeviceFamily::from_version(9), None);
    }
}
