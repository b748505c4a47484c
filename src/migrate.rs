//! Ordered migration of the archive into the remote store
//!
//! The traversal is strictly sequential: years ascending, seasons in
//! calendar order, playlists in reverse file order, works in file order.
//! Every create is awaited before the next starts, which guarantees a
//! playlist record exists before any of its works are looked up by name.
//! The shared rate limiter already serializes the underlying calls, so
//! parallel fan-out would buy nothing.

use async_trait::async_trait;
use tracing::info;

use crate::archive::{Archive, Season, Work};
use crate::error::Result;

/// Playlist rank spacing; gaps allow manual reordering without renumbering
pub const PLAYLIST_ORDER_STEP: u32 = 10;
/// Work rank spacing within a playlist
pub const WORK_ORDER_STEP: u32 = 100;

/// Fully-mapped payload for one remote playlist record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRecord {
    pub name: String,
    pub year: u16,
    pub season: Season,
    pub order: u32,
}

/// Fully-mapped payload for one remote work record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRecord {
    pub name: String,
    pub artists: Vec<String>,
    /// Name of the owning playlist, resolved remotely at create time
    pub playlist_name: String,
    pub order: u32,
    pub youtube: String,
    pub spotify: String,
    pub soundcloud: String,
    pub tiktok: bool,
    pub douyin: bool,
    pub meme: bool,
    pub classical: bool,
    pub album: bool,
}

impl WorkRecord {
    /// Apply the field-mapping policy: title falls back to album, absent
    /// links become empty strings, absent flags become false, and the album
    /// flag is set iff the source record carried an album field.
    pub fn from_work(work: &Work, playlist_name: &str, order: u32) -> Self {
        let links = &work.links;
        Self {
            name: work.display_name().to_string(),
            artists: work.artist_names(),
            playlist_name: playlist_name.to_string(),
            order,
            youtube: links.youtube.clone().unwrap_or_default(),
            spotify: links.spotify.clone().unwrap_or_default(),
            soundcloud: links.soundcloud.clone().unwrap_or_default(),
            tiktok: links.tiktok,
            douyin: links.douyin,
            meme: links.meme,
            classical: links.classical,
            album: work.is_album(),
        }
    }
}

/// Sink for remote record creation
///
/// Implemented by [`crate::notion::NotionClient`]; tests substitute an
/// in-memory recording store.
#[async_trait]
pub trait RecordStore {
    async fn create_playlist(&self, record: &PlaylistRecord) -> Result<()>;
    async fn create_work(&self, record: &WorkRecord) -> Result<()>;
}

/// Counts of records created by a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub playlists: usize,
    pub works: usize,
}

/// Walks the archive and drives record creation in rank order
pub struct Migrator<S> {
    store: S,
}

impl<S: RecordStore + Sync> Migrator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create every playlist and work record, aborting on the first error.
    ///
    /// The run is not idempotent: re-running after a partial failure
    /// creates duplicates of everything already migrated.
    pub async fn run(&self, archive: &Archive) -> Result<MigrationSummary> {
        let mut summary = MigrationSummary::default();

        for (year, bucket) in archive.years() {
            for season in Season::ALL {
                let playlists = bucket.season(season);

                // Last playlist in the file ranks first, so the most
                // recently added one displays at the top of the season.
                let mut playlist_order = PLAYLIST_ORDER_STEP;
                for playlist in playlists.iter().rev() {
                    let record = PlaylistRecord {
                        name: playlist.name.clone(),
                        year,
                        season,
                        order: playlist_order,
                    };
                    self.store.create_playlist(&record).await?;
                    info!(
                        year,
                        season = %season,
                        playlist = %record.name,
                        order = record.order,
                        "Created playlist record"
                    );
                    summary.playlists += 1;
                    playlist_order += PLAYLIST_ORDER_STEP;

                    let mut work_order = WORK_ORDER_STEP;
                    for work in &playlist.works {
                        let record = WorkRecord::from_work(work, &playlist.name, work_order);
                        self.store.create_work(&record).await?;
                        info!(
                            playlist = %playlist.name,
                            work = %record.name,
                            order = record.order,
                            "Created work record"
                        );
                        summary.works += 1;
                        work_order += WORK_ORDER_STEP;
                    }
                }
            }
        }

        Ok(summary)
    }
}
