use super::{Album, AudiobookTrack, Artist, Picture, Playlist, PodcastEpisode, Track, Video};
use std::collections::HashMap;

/// Complete media library decoded from a ZMDB file
///
/// Owns copies of every parsed record; holds no reference back into the
/// input buffer and no parser-internal memoization state (spec §3.9).
#[derive(Debug, Clone, Default)]
pub struct Library {
    tracks: Vec<Track>,
    videos: Vec<Video>,
    pictures: Vec<Picture>,
    playlists: Vec<Playlist>,
    podcasts: Vec<PodcastEpisode>,
    audiobooks: Vec<AudiobookTrack>,

    /// Keyed by album atom-id; populated as a side effect of resolving
    /// album-refs during track/playlist parsing (spec §4.10)
    albums: HashMap<u32, Album>,

    /// Standalone artists swept from the index, keyed by atom-id. Not part
    /// of the entity list in spec §3.7's table, but useful for a consumer
    /// that wants the full artist roster rather than per-track names.
    artists: HashMap<u32, Artist>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn add_video(&mut self, video: Video) {
        self.videos.push(video);
    }

    pub fn add_picture(&mut self, picture: Picture) {
        self.pictures.push(picture);
    }

    pub fn add_playlist(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    pub fn add_podcast(&mut self, podcast: PodcastEpisode) {
        self.podcasts.push(podcast);
    }

    pub fn add_audiobook(&mut self, audiobook: AudiobookTrack) {
        self.audiobooks.push(audiobook);
    }

    pub fn insert_album(&mut self, album: Album) {
        self.albums.insert(album.atom_id, album);
    }

    pub fn insert_artist(&mut self, artist: Artist) {
        self.artists.insert(artist.atom_id, artist);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn podcasts(&self) -> &[PodcastEpisode] {
        &self.podcasts
    }

    pub fn audiobooks(&self) -> &[AudiobookTrack] {
        &self.audiobooks
    }

    pub fn albums(&self) -> &HashMap<u32, Album> {
        &self.albums
    }

    pub fn artists(&self) -> &HashMap<u32, Artist> {
        &self.artists
    }

    pub fn album(&self, atom_id: u32) -> Option<&Album> {
        self.albums.get(&atom_id)
    }

    /// Look up a track by atom-id, for lazily resolving playlist members
    pub fn track(&self, atom_id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.atom_id == atom_id)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    pub fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    pub fn podcast_count(&self) -> usize {
        self.podcasts.len()
    }

    pub fn audiobook_count(&self) -> usize {
        self.audiobooks.len()
    }

    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_library_has_zero_counts() {
        let lib = Library::new();
        assert_eq!(lib.track_count(), 0);
        assert_eq!(lib.album_count(), 0);
        assert_eq!(lib.playlist_count(), 0);
    }

    #[test]
    fn album_lookup_by_atom_id() {
        let mut lib = Library::new();
        lib.insert_album(Album {
            atom_id: 0x06000002,
            title: "Album One".into(),
            artist_name: "Artist Alpha".into(),
            artist_guid: None,
            album_pid: 0x06000002,
            alb_reference: "Artist Alpha--Album One.alb".into(),
            artist_ref: 0x08000001,
        });

        assert_eq!(lib.album_count(), 1);
        assert_eq!(lib.album(0x06000002).unwrap().title, "Album One");
        assert!(lib.album(0x06000003).is_none());
    }
}
