//! Reference resolution and per-schema record parsing
//!
//! A ZMDB record rarely carries its own strings: a track names its album
//! and artist by atom-id and leaves the lookup to the reader. [`Resolver`]
//! owns the atom-id index and memoizes those lookups so a library with a
//! handful of albums shared across thousands of tracks doesn't redo the
//! same string decode thousands of times.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, trace, warn};

use super::bytes::{read_byte_or_zero, read_u16_le_or_zero, read_u32_le_or_zero, read_u64_le_or_zero, read_i32_le_or_zero};
use super::descriptor::{self, Descriptor, IndexEntry};
use super::family::FamilyLayout;
use super::record::{read_record_data, read_record_prefix, RecordPrefix};
use super::schema::SchemaKind;
use super::strings::{format_guid, read_utf16le_double_nul, read_utf8_nul};
use super::varint::{find_field, scan_tail_fields};

use crate::model::{Album, Artist, AudiobookTrack, Picture, Playlist, PodcastEpisode, Track, Video};

/// Tail field ids observed across schemas (spec §4.7/§9 supplements).
/// These are small, family-independent constants: the varint tail
/// encoding is the same regardless of device generation.
mod field_id {
    pub const FILENAME: u32 = 0x44;
    pub const GUID: u32 = 0x14;
    pub const AUTHOR_UNSTRIPPED: u32 = 0x46;
    pub const SKIP_COUNT: u32 = 0x63;
    pub const DISC_NUMBER: u32 = 0x6c;
    pub const LAST_PLAYED: u32 = 0x70;
}

/// Resolves atom-id references into the strings and nested entities a
/// record names but doesn't carry inline.
pub struct Resolver<'a> {
    buf: &'a [u8],
    layout: FamilyLayout,
    index: HashMap<u32, u32>,
    string_cache: RefCell<HashMap<u32, Option<String>>>,
    artist_cache: RefCell<HashMap<u32, Option<Artist>>>,
    album_cache: RefCell<HashMap<u32, Option<Album>>>,
}

impl<'a> Resolver<'a> {
    fn new(buf: &'a [u8], layout: FamilyLayout, index: HashMap<u32, u32>) -> Self {
        Self {
            buf,
            layout,
            index,
            string_cache: RefCell::new(HashMap::new()),
            artist_cache: RefCell::new(HashMap::new()),
            album_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Locate and validate the record behind an atom-id, if present.
    fn lookup(&self, atom_id: u32) -> Option<(usize, RecordPrefix, &'a [u8])> {
        let offset = *self.index.get(&atom_id)? as usize;
        let prefix = read_record_prefix(self.buf, offset).ok()?;
        let data = read_record_data(self.buf, offset, &prefix).ok()?;
        Some((offset, prefix, data))
    }

    /// Resolve a string-bearing atom-id (Filename, Genre, VideoTitle,
    /// PhotoAlbum, Collection, PodcastShow, AudiobookTitle) to its text.
    fn resolve_string(&self, atom_id: u32) -> Option<String> {
        if atom_id == 0 {
            return None;
        }
        if let Some(cached) = self.string_cache.borrow().get(&atom_id) {
            return cached.clone();
        }

        let resolved = self.resolve_string_uncached(atom_id);
        self.string_cache
            .borrow_mut()
            .insert(atom_id, resolved.clone());
        resolved
    }

    fn resolve_string_uncached(&self, atom_id: u32) -> Option<String> {
        let (schema_code, _) = descriptor::split_atom_id(atom_id);
        let kind = SchemaKind::from_code(schema_code)?;
        let (_, _, data) = self.lookup(atom_id)?;

        let text = match kind {
            SchemaKind::Filename => read_utf16le_double_nul(data, 8, data.len().saturating_sub(8)),
            SchemaKind::PodcastShow => {
                read_utf16le_double_nul(data, 8, data.len().saturating_sub(8))
            }
            SchemaKind::Genre => read_utf8_nul(data, 1, data.len().saturating_sub(1)),
            SchemaKind::VideoTitle => read_utf8_nul(data, 4, data.len().saturating_sub(4)),
            SchemaKind::PhotoAlbum | SchemaKind::Collection => read_utf8_nul(
                data,
                self.layout.photo_collection_text_offset,
                data.len()
                    .saturating_sub(self.layout.photo_collection_text_offset),
            ),
            SchemaKind::AudiobookTitle => read_utf8_nul(data, 8, data.len().saturating_sub(8)),
            _ => return None,
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Resolve an artist atom-id. Returns `None` both when the reference
    /// is absent and when the record is a placeholder (its first ref
    /// field is zero, spec §4.9).
    fn resolve_artist(&self, atom_id: u32) -> Option<Artist> {
        if atom_id == 0 {
            return None;
        }
        if let Some(cached) = self.artist_cache.borrow().get(&atom_id) {
            return cached.clone();
        }

        let resolved = self.resolve_artist_uncached(atom_id);
        self.artist_cache
            .borrow_mut()
            .insert(atom_id, resolved.clone());
        resolved
    }

    fn resolve_artist_uncached(&self, atom_id: u32) -> Option<Artist> {
        let (_, prefix, data) = self.lookup(atom_id)?;
        if read_u32_le_or_zero(data, 0) == 0 {
            trace!("artist {atom_id:#010x} is a placeholder (ref0 == 0)");
            return None;
        }

        let fixed_end = SchemaKind::Artist.entry_size();
        let fields = scan_tail_fields(self.buf, fixed_end, prefix.record_size as usize);

        let name = read_utf8_nul(
            data,
            self.layout.artist_name_offset,
            data.len()
                .saturating_sub(self.layout.artist_name_offset),
        );
        let filename = find_field(&fields, field_id::FILENAME)
            .map(|f| read_utf16le_double_nul(f.bytes(data), 0, f.len()))
            .unwrap_or_default();
        let guid = find_field(&fields, field_id::GUID).and_then(|f| format_guid(f.bytes(data)));

        Some(Artist {
            atom_id,
            name,
            filename,
            guid,
        })
    }

    /// Resolve an album atom-id, registering the resolved album's artist
    /// as a side effect the way [`crate::model::Library`] expects.
    fn resolve_album(&self, atom_id: u32) -> Option<Album> {
        if atom_id == 0 {
            return None;
        }
        if let Some(cached) = self.album_cache.borrow().get(&atom_id) {
            return cached.clone();
        }

        let resolved = self.resolve_album_uncached(atom_id);
        self.album_cache
            .borrow_mut()
            .insert(atom_id, resolved.clone());
        resolved
    }

    fn resolve_album_uncached(&self, atom_id: u32) -> Option<Album> {
        let (_, prefix, data) = self.lookup(atom_id)?;
        let artist_ref = read_u32_le_or_zero(data, 0);
        let title_offset = self.layout.album_title_offset;
        let title = read_utf8_nul(data, title_offset, data.len().saturating_sub(title_offset));

        // HD carries `alb_reference` as a backwards-varint tail field;
        // Classic instead stores it as a UTF-16LE string sequentially
        // right after the title in the fixed area (spec §4.8).
        let is_hd = self.layout.music_title == 32;
        let alb_reference = if is_hd {
            let fixed_end = SchemaKind::Album.entry_size();
            let fields = scan_tail_fields(self.buf, fixed_end, prefix.record_size as usize);
            find_field(&fields, field_id::FILENAME)
                .map(|f| read_utf16le_double_nul(f.bytes(data), 0, f.len()))
                .unwrap_or_default()
        } else {
            let reference_offset = title_offset + title.len() + 1;
            read_utf16le_double_nul(
                data,
                reference_offset,
                data.len().saturating_sub(reference_offset),
            )
        };

        let artist = self.resolve_artist(artist_ref);
        let (artist_name, artist_guid) = match &artist {
            Some(a) => (a.name.clone(), a.guid.clone()),
            None => (String::new(), None),
        };

        Some(Album {
            atom_id,
            title,
            artist_name,
            artist_guid,
            album_pid: atom_id,
            alb_reference,
            artist_ref,
        })
    }
}

/// Returns `true` if every reference field in a fixed prefix is zero,
/// marking a root/system record rather than real media (spec §4.9).
fn refs_all_zero(data: &[u8], offsets: &[usize]) -> bool {
    offsets
        .iter()
        .all(|&offset| read_u32_le_or_zero(data, offset) == 0)
}

fn parse_music(
    resolver: &Resolver,
    library: &mut crate::model::Library,
    atom_id: u32,
    data: &[u8],
) {
    let layout = &resolver.layout;
    if data.len() < SchemaKind::Music.entry_size() {
        warn!("music record {atom_id:#010x} shorter than its fixed prefix, skipping");
        return;
    }
    if data.len() == SchemaKind::Music.entry_size() {
        trace!("music record {atom_id:#010x} has no tail, treating as placeholder");
        return;
    }

    let album_ref = read_u32_le_or_zero(data, layout.music_album_ref);
    let artist_ref = read_u32_le_or_zero(data, layout.music_artist_ref);
    let genre_ref = read_u32_le_or_zero(data, layout.music_genre_ref);
    let filename_ref = read_u32_le_or_zero(data, layout.music_filename_ref);

    if refs_all_zero(
        data,
        &[
            layout.music_album_ref,
            layout.music_artist_ref,
            layout.music_genre_ref,
        ],
    ) {
        trace!("music record {atom_id:#010x} is a root/system record, skipping");
        return;
    }

    let duration_ms = read_i32_le_or_zero(data, layout.music_duration);
    let title = read_utf8_nul(data, layout.music_title, data.len() - layout.music_title);

    // HD stores file size as a plain fixed field; Classic's byte 20
    // onward is reused for the track-number/metadata-count/codec/rating
    // run instead, so Classic tracks don't carry a fixed file size.
    let is_hd = layout.music_title == 32;
    let (file_size_bytes, track_number, codec_id, rating, disc_number, mut play_count, mut skip_count) =
        if is_hd {
            let file_size_bytes = read_i32_le_or_zero(data, layout.music_file_size);
            let track_number = u32::from(read_u16_le_or_zero(data, 24));
            let codec_id = read_u16_le_or_zero(data, 28);
            (file_size_bytes, track_number, codec_id, 0u8, 1u8, 0u16, 0u16)
        } else {
            let track_number = u32::from(read_byte_or_zero(data, 20));
            let codec_id = read_u16_le_or_zero(data, 24);
            let rating = read_byte_or_zero(data, 26);
            (0i32, track_number, codec_id, rating, 1u8, 0u16, 0u16)
        };

    if !is_hd {
        // Classic tracks carry play/skip counters as a run of 6-byte
        // micro-records right after the title string, instead of in the
        // backwards-varint tail: `[u32 count][0x04][u8 kind]`.
        let metadata_record_count = read_u16_le_or_zero(data, 22) as usize;
        let title_end = layout.music_title + title.len() + 1;
        for i in 0..metadata_record_count {
            let record_start = title_end + i * 6;
            if record_start + 6 > data.len() {
                break;
            }
            let count = read_u32_le_or_zero(data, record_start);
            let marker = read_byte_or_zero(data, record_start + 4);
            let kind = read_byte_or_zero(data, record_start + 5);
            if marker != 0x04 {
                continue;
            }
            match kind {
                0x62 => play_count = count as u16,
                0x63 => skip_count = count as u16,
                _ => {}
            }
        }
    }

    let fixed_end = SchemaKind::Music.entry_size();
    let fields = scan_tail_fields(resolver.buf, fixed_end, data.len());
    let last_played = find_field(&fields, field_id::LAST_PLAYED)
        .map(|f| read_u64_le_or_zero(f.bytes(data), 0))
        .unwrap_or(0);
    let disc_number = find_field(&fields, field_id::DISC_NUMBER)
        .map(|f| read_byte_or_zero(f.bytes(data), 0))
        .filter(|&n| n != 0)
        .unwrap_or(disc_number);
    if is_hd {
        // HD supplies skip count via the tail rather than Classic's
        // 6-byte play/skip micro-records.
        if let Some(f) = find_field(&fields, field_id::SKIP_COUNT) {
            skip_count = read_u16_le_or_zero(f.bytes(data), 0);
        }
    }

    let filename = resolver.resolve_string(filename_ref).unwrap_or_default();
    let genre = resolver.resolve_string(genre_ref).unwrap_or_default();

    let album = resolver.resolve_album(album_ref);
    let (album_name, album_artist_name, album_artist_guid) = match &album {
        Some(a) => (a.title.clone(), a.artist_name.clone(), a.artist_guid.clone()),
        None => (String::new(), String::new(), None),
    };
    if let Some(album) = album {
        library.insert_album(album);
    }

    let artist = resolver.resolve_artist(artist_ref);
    let (artist_name, artist_guid) = match &artist {
        Some(a) => (a.name.clone(), a.guid.clone()),
        None => (String::new(), None),
    };
    if let Some(artist) = artist {
        library.insert_artist(artist);
    }

    library.add_track(Track {
        atom_id,
        title,
        artist_name,
        artist_guid,
        album_name,
        album_artist_name,
        album_artist_guid,
        genre,
        disc_number,
        track_number,
        duration_ms,
        file_size_bytes,
        play_count,
        skip_count,
        codec_id,
        rating,
        last_played,
        album_ref,
        filename,
    });
}

fn parse_video(resolver: &Resolver, library: &mut crate::model::Library, atom_id: u32, data: &[u8]) {
    if data.len() < 16 {
        return;
    }

    let folder_ref = read_u32_le_or_zero(data, 0);
    let title_ref = read_u32_le_or_zero(data, 4);
    let ref2 = read_u32_le_or_zero(data, 8);

    let (file_size_bytes, codec_id) = if data.len() >= 40 {
        (
            read_u32_le_or_zero(data, 32),
            read_u32_le_or_zero(data, 36),
        )
    } else {
        (0, 0)
    };

    let folder = resolver.resolve_string(folder_ref).unwrap_or_default();
    let title = resolver.resolve_string(title_ref).unwrap_or_default();

    let fixed_end = SchemaKind::Video.entry_size();
    let fields = scan_tail_fields(resolver.buf, fixed_end, data.len());
    let filename = find_field(&fields, field_id::FILENAME)
        .map(|f| read_utf16le_double_nul(f.bytes(data), 0, f.len()))
        .unwrap_or_default();

    library.add_video(Video {
        atom_id,
        title,
        folder,
        codec_id,
        file_size_bytes,
        filename,
        ref2,
    });
}

fn parse_picture(resolver: &Resolver, library: &mut crate::model::Library, atom_id: u32, data: &[u8]) {
    if data.len() < SchemaKind::Picture.entry_size() {
        return;
    }

    let folder_ref = read_u32_le_or_zero(data, 0);
    let photo_album_ref = read_u32_le_or_zero(data, 4);
    let collection_ref = read_u32_le_or_zero(data, 8);
    let file_ref = read_u32_le_or_zero(data, 12);
    let timestamp = read_u64_le_or_zero(data, 16);
    let title = read_utf8_nul(data, 24, data.len().saturating_sub(24));

    library.add_picture(Picture {
        atom_id,
        title,
        photo_album: resolver.resolve_string(photo_album_ref).unwrap_or_default(),
        user_album: resolver.resolve_string(folder_ref).unwrap_or_default(),
        collection: resolver.resolve_string(collection_ref).unwrap_or_default(),
        filename: resolver.resolve_string(file_ref).unwrap_or_default(),
        timestamp,
    });
}

fn parse_playlist(
    resolver: &Resolver,
    library: &mut crate::model::Library,
    atom_id: u32,
    data: &[u8],
) {
    if data.len() < SchemaKind::Playlist.entry_size() {
        return;
    }
    let folder_ref = read_u32_le_or_zero(data, 8);
    let folder = resolver.resolve_string(folder_ref).unwrap_or_default();

    // The name, GUID, filename, and member list are not tail fields: they
    // sit sequentially right after the fixed prefix (spec §4.8), so this
    // walks a cursor forward instead of scanning backwards varints.
    let mut name_end = 12;
    while name_end < data.len() && data[name_end] != 0 {
        name_end += 1;
    }
    if name_end <= 12 {
        library.add_playlist(Playlist {
            atom_id,
            name: String::new(),
            filename: String::new(),
            guid: None,
            folder,
            track_atom_ids: Vec::new(),
        });
        return;
    }
    let name = String::from_utf8_lossy(&data[12..name_end]).into_owned();

    let mut guid = None;
    let mut filename = String::new();
    let mut track_atom_ids = Vec::new();

    let guid_start = name_end + 1;
    if guid_start + 16 <= data.len() {
        guid = format_guid(&data[guid_start..guid_start + 16]);

        let utf16_start = guid_start + 16 + 2;
        let mut filename_end = utf16_start;
        while filename_end + 1 < data.len() {
            if data[filename_end] == 0 && data[filename_end + 1] == 0 {
                break;
            }
            filename_end += 2;
        }

        if filename_end > utf16_start {
            filename = read_utf16le_double_nul(
                &data[utf16_start..filename_end],
                0,
                filename_end - utf16_start,
            );
        }

        // Track membership is stored as a trailing array of atom-ids, not
        // full resolved tracks: a playlist names its members, it doesn't
        // carry copies of them (spec §9).
        let mut cursor = filename_end + 4;
        while cursor + 4 <= data.len() {
            let track_id = read_u32_le_or_zero(data, cursor);
            if track_id == 0 {
                break;
            }
            track_atom_ids.push(track_id);
            cursor += 4;
        }
    }

    library.add_playlist(Playlist {
        atom_id,
        name,
        filename,
        guid,
        folder,
        track_atom_ids,
    });
}

fn parse_podcast_episode(
    resolver: &Resolver,
    library: &mut crate::model::Library,
    atom_id: u32,
    data: &[u8],
) {
    if data.len() < SchemaKind::PodcastEpisode.entry_size() {
        return;
    }
    let show_ref = read_u32_le_or_zero(data, 0);
    let duration_ms = read_u32_le_or_zero(data, 4);
    let file_size_bytes = read_u32_le_or_zero(data, 8);
    let codec_id = read_u16_le_or_zero(data, 12);
    let timestamp = read_u64_le_or_zero(data, 16);
    let title = read_utf8_nul(data, 24, data.len().saturating_sub(24));

    let fixed_end = SchemaKind::PodcastEpisode.entry_size();
    let fields = scan_tail_fields(resolver.buf, fixed_end, data.len());

    // The description is rebuilt from marker-prefixed fragments rather
    // than stored as one contiguous string.
    let mut description = String::new();
    for field in &fields {
        if field.id == 0x50 {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&read_utf8_nul(field.bytes(data), 0, field.len()));
        }
    }

    let mut audio_url = String::new();
    let mut rss_url = String::new();
    for field in &fields {
        if field.len() > 100 {
            let url = read_utf8_nul(field.bytes(data), 0, field.len());
            let lower = url.to_ascii_lowercase();
            let looks_like_audio = lower.contains("http")
                && (lower.ends_with(".mp3") || lower.ends_with(".m4a") || lower.contains("/audio/"));
            let looks_like_rss =
                lower.ends_with(".rss") || lower.contains("/rss") || lower.contains("/feed");
            if looks_like_audio {
                audio_url = url;
            } else if looks_like_rss {
                rss_url = url;
            }
        }
    }

    let show_name = resolver.resolve_string(show_ref).unwrap_or_default();

    library.add_podcast(PodcastEpisode {
        atom_id,
        title,
        show_name,
        author: String::new(),
        description,
        audio_url,
        rss_url,
        duration_ms,
        timestamp,
        file_size_bytes,
        codec_id,
        ref3: show_ref,
    });
}

fn parse_audiobook_track(
    resolver: &Resolver,
    library: &mut crate::model::Library,
    atom_id: u32,
    data: &[u8],
) {
    if data.len() < SchemaKind::AudiobookTrack.entry_size() {
        return;
    }
    let title_ref = read_u32_le_or_zero(data, 0);
    let filename_ref = read_u32_le_or_zero(data, 4);
    let duration_ms = read_u32_le_or_zero(data, 8);
    let playback_position_ms = read_u32_le_or_zero(data, 12);
    let file_size_bytes = read_u32_le_or_zero(data, 24);
    let track_number = read_u16_le_or_zero(data, 28);
    let play_count = read_u16_le_or_zero(data, 30);
    let format_code = read_u16_le_or_zero(data, 32);
    let title = read_utf8_nul(data, 36, data.len().saturating_sub(36));

    let fixed_end = SchemaKind::AudiobookTrack.entry_size();
    let fields = scan_tail_fields(resolver.buf, fixed_end, data.len());

    let author = find_field(&fields, field_id::AUTHOR_UNSTRIPPED)
        .map(|f| super::strings::utf16le_to_utf8(f.bytes(data)))
        .unwrap_or_default();
    let filename = find_field(&fields, field_id::FILENAME)
        .map(|f| read_utf16le_double_nul(f.bytes(data), 0, f.len()))
        .unwrap_or_default();
    let last_played = find_field(&fields, field_id::LAST_PLAYED)
        .map(|f| read_u64_le_or_zero(f.bytes(data), 0))
        .unwrap_or(0);

    let audiobook_name = resolver.resolve_string(title_ref).unwrap_or_default();
    let filename = if filename.is_empty() {
        resolver.resolve_string(filename_ref).unwrap_or_default()
    } else {
        filename
    };

    library.add_audiobook(AudiobookTrack {
        atom_id,
        title,
        audiobook_name,
        author,
        filename,
        duration_ms,
        playback_position_ms,
        file_size_bytes,
        track_number,
        play_count,
        format_code,
        last_played,
        title_ref,
        filename_ref,
    });
}

/// Sweep every descriptor, dispatch each live entry to its schema parser,
/// and return the accumulated library (spec §5).
pub fn extract(buf: &[u8], layout: FamilyLayout, descriptors: &[Descriptor]) -> crate::model::Library {
    let mut library = crate::model::Library::new();

    let index_descriptor = descriptors[0];
    let index_entries: Vec<IndexEntry> = match descriptor::read_index_table(buf, &index_descriptor) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("failed to read atom-id index: {err}");
            return library;
        }
    };
    let index: HashMap<u32, u32> = index_entries
        .into_iter()
        .map(|e| (e.atom_id, e.record_offset))
        .collect();
    debug!("indexed {} atom-ids", index.len());

    let resolver = Resolver::new(buf, layout, index);

    for (descriptor_index, kind) in layout.swept_descriptors() {
        if descriptor_index >= descriptors.len() {
            continue;
        }
        let descriptor = descriptors[descriptor_index];
        if descriptor.is_empty() {
            continue;
        }
        trace!(
            "sweeping descriptor {descriptor_index} ({} entries) as {kind:?}",
            descriptor.entry_count
        );

        for i in 0..descriptor.entry_count as usize {
            let entry_offset = descriptor.data_offset as usize + i * descriptor.entry_size as usize;
            let atom_id = read_u32_le_or_zero(buf, entry_offset);
            if atom_id == 0 {
                continue;
            }

            let Some((_, _, data)) = resolver.lookup(atom_id) else {
                continue;
            };

            match kind {
                SchemaKind::Music => parse_music(&resolver, &mut library, atom_id, data),
                SchemaKind::Video => parse_video(&resolver, &mut library, atom_id, data),
                SchemaKind::Picture => parse_picture(&resolver, &mut library, atom_id, data),
                SchemaKind::Playlist => parse_playlist(&resolver, &mut library, atom_id, data),
                SchemaKind::PodcastEpisode => {
                    parse_podcast_episode(&resolver, &mut library, atom_id, data)
                }
                SchemaKind::AudiobookTrack => {
                    parse_audiobook_track(&resolver, &mut library, atom_id, data)
                }
                _ => {}
            }
        }
    }

    library
}
