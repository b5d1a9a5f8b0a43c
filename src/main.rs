use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use zmdb::DeviceFamily;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FamilyArg {
    Hd,
    Classic,
}

impl From<FamilyArg> for DeviceFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Hd => DeviceFamily::Hd,
            FamilyArg::Classic => DeviceFamily::Classic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "zmdb-dump")]
#[command(about = "Dump the contents of a Zune ZMDB media catalog", long_about = None)]
struct Args {
    /// Path to the ZMDB file (typically `ZuneMediaDatabase`)
    path: PathBuf,

    /// Device family the file came from. If omitted, it's detected from
    /// the file's own version field.
    #[arg(short, long, value_enum)]
    family: Option<FamilyArg>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let family = match args.family {
        Some(family) => family.into(),
        None => zmdb::detect_family(&bytes)
            .with_context(|| "could not detect device family from header; pass --family")?,
    };

    log::info!("parsing {} as {family:?}", args.path.display());
    let library = zmdb::parse(&bytes, family);

    println!("tracks:      {}", library.track_count());
    println!("videos:      {}", library.video_count());
    println!("pictures:    {}", library.picture_count());
    println!("playlists:   {}", library.playlist_count());
    println!("podcasts:    {}", library.podcast_count());
    println!("audiobooks:  {}", library.audiobook_count());
    println!("albums:      {}", library.album_count());
    println!("artists:     {}", library.artist_count());

    if args.verbose {
        for track in library.tracks() {
            println!(
                "  {:#010x}  {} - {} ({})",
                track.atom_id, track.artist_name, track.title, track.album_name
            );
        }
    }

    Ok(())
}
