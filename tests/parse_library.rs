//! End-to-end parsing tests against hand-built ZMDB buffers
//!
//! These don't come from a real device; they're the smallest buffers that
//! satisfy the format's structural rules (magic tags, descriptor table,
//! atom-id index, backwards-varint tails) for a given scenario.

use zmdb::DeviceFamily;

const DESCRIPTOR_COUNT: usize = 96;
const DESCRIPTOR_SIZE: usize = 20;
const HEADER_SIZE: usize = 0x34; // ZArr tag at 0x30, table starts right after

fn encode_varint(mut value: u32) -> Vec<u8> {
    let mut groups = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    groups.reverse();
    groups
}

fn encode_tail_field(id: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(data);
    out.extend_from_slice(&encode_varint(data.len() as u32));
    out.extend_from_slice(&encode_varint(id));
    out
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// Builds a ZMDB buffer one record at a time, wiring up the header,
/// descriptor table, and atom-id index as records are appended.
struct Builder {
    buf: Vec<u8>,
    version: u32,
    index_entries: Vec<(u32, u32)>,
    swept: Vec<(usize, u32)>, // (descriptor index, atom id)
}

impl Builder {
    fn new(version: u32) -> Self {
        let mut buf = vec![0u8; HEADER_SIZE + DESCRIPTOR_COUNT * DESCRIPTOR_SIZE];
        buf[0..4].copy_from_slice(b"ZMDB");
        buf[0x20..0x24].copy_from_slice(b"ZMed");
        buf[0x24..0x28].copy_from_slice(&version.to_le_bytes());
        buf[0x30..0x34].copy_from_slice(b"ZArr");

        Self {
            buf,
            version,
            index_entries: Vec::new(),
            swept: Vec::new(),
        }
    }

    /// Append a record's data (without its 4-byte prefix) and register it
    /// under `atom_id` in the index. Returns the record's data offset.
    fn push_record(&mut self, atom_id: u32, data: &[u8]) -> u32 {
        // 4-byte prefix: record_size in the low 24 bits, no flags.
        let prefix_word = data.len() as u32 & 0x00ff_ffff;
        self.buf.extend_from_slice(&prefix_word.to_le_bytes());
        let offset = self.buf.len() as u32;
        self.buf.extend_from_slice(data);
        self.index_entries.push((atom_id, offset));
        offset
    }

    fn sweep(&mut self, descriptor_index: usize, atom_id: u32) {
        self.swept.push((descriptor_index, atom_id));
    }

    fn write_descriptor(&mut self, index: usize, entry_size: u16, entry_count: u32, data_offset: u32) {
        let base = HEADER_SIZE + index * DESCRIPTOR_SIZE;
        self.buf[base + 6..base + 8].copy_from_slice(&entry_size.to_le_bytes());
        self.buf[base + 8..base + 12].copy_from_slice(&entry_count.to_le_bytes());
        self.buf[base + 16..base + 20].copy_from_slice(&data_offset.to_le_bytes());
    }

    /// Lay down the index table (descriptor 0) and each swept descriptor's
    /// atom-id list, then return the finished buffer.
    fn finish(mut self) -> Vec<u8> {
        let index_offset = self.buf.len() as u32;
        for (atom_id, record_offset) in &self.index_entries {
            self.buf.extend_from_slice(&atom_id.to_le_bytes());
            self.buf.extend_from_slice(&record_offset.to_le_bytes());
        }
        self.write_descriptor(0, 8, self.index_entries.len() as u32, index_offset);

        let mut by_descriptor: std::collections::BTreeMap<usize, Vec<u32>> =
            std::collections::BTreeMap::new();
        for (descriptor_index, atom_id) in &self.swept {
            by_descriptor.entry(*descriptor_index).or_default().push(*atom_id);
        }
        for (descriptor_index, atom_ids) in by_descriptor {
            let offset = self.buf.len() as u32;
            for atom_id in &atom_ids {
                self.buf.extend_from_slice(&atom_id.to_le_bytes());
            }
            self.write_descriptor(descriptor_index, 4, atom_ids.len() as u32, offset);
        }

        let _ = self.version;
        self.buf
    }
}

fn hd_artist(builder: &mut Builder, atom_id: u32, name: &str, guid: [u8; 16]) {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_le_bytes()); // ref0 != 0
    data.extend_from_slice(name.as_bytes());
    data.push(0);
    data.extend_from_slice(&encode_tail_field(0x14, &guid));
    builder.push_record(atom_id, &data);
}

fn hd_album(builder: &mut Builder, atom_id: u32, artist_ref: u32, title: &str) {
    let mut data = Vec::new();
    data.extend_from_slice(&artist_ref.to_le_bytes());
    data.extend_from_slice(&[0u8; 16]); // padding up to the title offset (20)
    data.extend_from_slice(title.as_bytes());
    data.push(0);
    let alb_reference = utf16le("Artist Alpha--Album One.alb");
    let mut alb_reference_padded = vec![0u8];
    alb_reference_padded.extend_from_slice(&alb_reference);
    alb_reference_padded.extend_from_slice(&[0, 0]);
    data.extend_from_slice(&encode_tail_field(0x44, &alb_reference_padded));
    builder.push_record(atom_id, &data);
}

fn hd_music_track(
    builder: &mut Builder,
    atom_id: u32,
    album_ref: u32,
    artist_ref: u32,
    title: &str,
) {
    let mut data = vec![0u8; 32];
    data[0..4].copy_from_slice(&album_ref.to_le_bytes());
    data[4..8].copy_from_slice(&artist_ref.to_le_bytes());
    // genre_ref @ 8, filename_ref @ 12 left at zero for this scenario
    data[16..20].copy_from_slice(&180_000i32.to_le_bytes()); // duration_ms
    data[20..24].copy_from_slice(&4_200_000i32.to_le_bytes()); // file_size_bytes
    data[24..26].copy_from_slice(&1u16.to_le_bytes()); // track_number
    data[28..30].copy_from_slice(&3u16.to_le_bytes()); // codec_id
    data.extend_from_slice(title.as_bytes());
    data.push(0);
    data.extend_from_slice(&encode_tail_field(0x70, &1_700_000_000u64.to_le_bytes()));
    builder.push_record(atom_id, &data);
}

#[test]
fn minimal_hd_file_with_no_records_parses_to_an_empty_library() {
    let builder = Builder::new(5);
    let buf = builder.finish();

    let library = zmdb::parse(&buf, DeviceFamily::Hd);
    assert_eq!(library.track_count(), 0);
    assert_eq!(library.album_count(), 0);
}

#[test]
fn single_hd_track_resolves_its_album_and_artist() {
    let mut builder = Builder::new(5);

    let artist_atom = 0x08_000001;
    let album_atom = 0x06_000001;
    let track_atom = 0x01_000001;

    hd_artist(&mut builder, artist_atom, "Artist Alpha", [0xAB; 16]);
    hd_album(&mut builder, album_atom, artist_atom, "Album One");
    hd_music_track(&mut builder, track_atom, album_atom, artist_atom, "Track One");
    builder.sweep(1, track_atom);

    let buf = builder.finish();
    let library = zmdb::parse(&buf, DeviceFamily::Hd);

    assert_eq!(library.track_count(), 1);
    let track = &library.tracks()[0];
    assert_eq!(track.title, "Track One");
    assert_eq!(track.artist_name, "Artist Alpha");
    assert_eq!(track.album_name, "Album One");
    assert_eq!(track.duration_ms, 180_000);
    assert_eq!(track.track_number, 1);
    assert_eq!(track.last_played, 1_700_000_000);

    assert_eq!(library.album_count(), 1);
    assert_eq!(library.album(album_atom).unwrap().artist_name, "Artist Alpha");
}

#[test]
fn placeholder_artist_is_not_resolved() {
    let mut builder = Builder::new(5);

    let artist_atom = 0x08_000002;
    // ref0 == 0 marks a placeholder artist record; it must not surface a name.
    builder.push_record(artist_atom, &[0u8; 4]);

    let album_atom = 0x06_000002;
    hd_album(&mut builder, album_atom, artist_atom, "Orphaned Album");

    let track_atom = 0x01_000002;
    hd_music_track(&mut builder, track_atom, album_atom, artist_atom, "Orphaned Track");
    builder.sweep(1, track_atom);

    let buf = builder.finish();
    let library = zmdb::parse(&buf, DeviceFamily::Hd);

    let track = &library.tracks()[0];
    assert_eq!(track.artist_name, "");
    assert_eq!(track.album_name, "Orphaned Album");
}

#[test]
fn all_zero_refs_are_filtered_as_a_root_record() {
    let mut builder = Builder::new(5);

    let track_atom = 0x01_000003;
    // Every ref field is zero: this looks like a root/system placeholder,
    // not real media, and should not appear in the library.
    let mut data = vec![0u8; 32];
    data.extend_from_slice(b"should not appear");
    data.push(0);
    builder.push_record(track_atom, &data);
    builder.sweep(1, track_atom);

    let buf = builder.finish();
    let library = zmdb::parse(&buf, DeviceFamily::Hd);

    assert_eq!(library.track_count(), 0);
}

#[test]
fn exactly_fixed_size_music_record_is_a_placeholder() {
    let mut builder = Builder::new(5);

    let track_atom = 0x01_000004;
    let mut data = vec![0u8; 32];
    data[0..4].copy_from_slice(&1u32.to_le_bytes());
    builder.push_record(track_atom, &data);
    builder.sweep(1, track_atom);

    let buf = builder.finish();
    let library = zmdb::parse(&buf, DeviceFamily::Hd);

    assert_eq!(library.track_count(), 0);
}

#[test]
fn corrupt_descriptor_table_yields_empty_library_without_panicking() {
    // Header is intact but the descriptor table runs off the end of the
    // buffer: the reader should degrade gracefully, not panic.
    let mut buf = vec![0u8; 0x40];
    buf[0..4].copy_from_slice(b"ZMDB");
    buf[0x20..0x24].copy_from_slice(b"ZMed");
    buf[0x24..0x28].copy_from_slice(&5u32.to_le_bytes());
    buf[0x30..0x34].copy_from_slice(b"ZArr");

    let library = zmdb::parse(&buf, DeviceFamily::Hd);
    assert_eq!(library.track_count(), 0);
}

#[test]
fn classic_album_title_is_read_from_its_own_offset() {
    let mut builder = Builder::new(2);

    let artist_atom = 0x08_000003;
    let album_atom = 0x06_000003;
    let track_atom = 0x01_000005;

    // Classic's artist name sits at offset 1, not HD's offset 4.
    let mut artist_data = Vec::new();
    artist_data.extend_from_slice(&1u32.to_le_bytes());
    artist_data.extend_from_slice(b"Artist Beta");
    artist_data.push(0);
    builder.push_record(artist_atom, &artist_data);

    // Classic's album title sits at offset 12, not HD's offset 20.
    let mut album_data = Vec::new();
    album_data.extend_from_slice(&artist_atom.to_le_bytes());
    album_data.extend_from_slice(&[0u8; 8]);
    album_data.extend_from_slice(b"Album Two");
    album_data.push(0);
    builder.push_record(album_atom, &album_data);

    // Classic music: track_number (u8) @20, metadata_record_count @22,
    // codec_id @24, rating @26, title @28.
    let mut track_data = vec![0u8; 28];
    track_data[0..4].copy_from_slice(&album_atom.to_le_bytes());
    track_data[4..8].copy_from_slice(&artist_atom.to_le_bytes());
    track_data[16..20].copy_from_slice(&210_000i32.to_le_bytes());
    track_data[20] = 7; // track_number
    track_data.extend_from_slice(b"Track Two");
    track_data.push(0);
    builder.push_record(track_atom, &track_data);
    builder.sweep(1, track_atom);

    let buf = builder.finish();
    let library = zmdb::parse(&buf, DeviceFamily::Classic);

    assert_eq!(library.track_count(), 1);
    let track = &library.tracks()[0];
    assert_eq!(track.title, "Track Two");
    assert_eq!(track.track_number, 7);
    assert_eq!(track.album_name, "Album Two");
    assert_eq!(track.artist_name, "Artist Beta");
    assert_eq!(library.album(album_atom).unwrap().title, "Album Two");
}
