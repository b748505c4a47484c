//! Legacy archive model and validating loader
//!
//! The source file is a YAML mapping: year key → season key → list of
//! single-entry mappings of playlist name → list of work records. Loading is
//! two-phase: serde deserializes the raw shape verbatim, then a validation
//! pass produces the typed [`Archive`]. A malformed file fails at load time
//! instead of surfacing as wrong data mid-migration.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Season slots within a year, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Canonical iteration order for traversal
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Lowercase form used by both the YAML keys and the remote select field
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Streaming links and category flags for a work
///
/// Every field is optional in the source file; absent URLs stay `None` and
/// absent flags default to false.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Links {
    pub youtube: Option<String>,
    pub spotify: Option<String>,
    pub soundcloud: Option<String>,
    pub tiktok: bool,
    pub douyin: bool,
    pub meme: bool,
    pub classical: bool,
}

/// A single musical work or album entry, validated
#[derive(Debug, Clone)]
pub struct Work {
    /// Title of a single work; absent for album entries
    pub title: Option<String>,
    /// Album name; presence marks the entry as an album
    pub album: Option<String>,
    /// Comma-separated artist names
    pub artist: Option<String>,
    pub links: Links,
}

impl Work {
    fn validate(raw: RawWork) -> Result<Self> {
        if raw.title.is_none() && raw.album.is_none() {
            return Err(Error::InvalidDocument(
                "work is missing both title and album".into(),
            ));
        }
        if let Some(artist) = &raw.artist {
            if artist.trim().is_empty() {
                let name = raw.title.as_deref().or(raw.album.as_deref()).unwrap_or("");
                return Err(Error::InvalidDocument(format!(
                    "work {name:?} has an empty artist field"
                )));
            }
        }
        Ok(Self {
            title: raw.title,
            album: raw.album,
            artist: raw.artist,
            links: raw.links.unwrap_or_default(),
        })
    }

    /// Display name: title, falling back to album
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.album.as_deref())
            .unwrap_or("")
    }

    /// Individual artist names, comma-split and trimmed
    pub fn artist_names(&self) -> Vec<String> {
        self.artist
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True iff the source record carried an album field
    pub fn is_album(&self) -> bool {
        self.album.is_some()
    }
}

/// A named, ordered sequence of works
#[derive(Debug, Clone)]
pub struct Playlist {
    pub name: String,
    pub works: Vec<Work>,
}

impl Playlist {
    fn validate(raw: RawPlaylist) -> Result<Self> {
        let count = raw.len();
        let mut entries = raw.into_iter();
        match (entries.next(), entries.next()) {
            (Some((name, raw_works)), None) => {
                let works = raw_works
                    .into_iter()
                    .map(Work::validate)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self { name, works })
            }
            _ => Err(Error::InvalidDocument(format!(
                "playlist entry must have exactly one name, found {count}"
            ))),
        }
    }
}

/// The four optional season slots of one year
#[derive(Debug, Clone, Default)]
pub struct YearBucket {
    spring: Vec<Playlist>,
    summer: Vec<Playlist>,
    autumn: Vec<Playlist>,
    winter: Vec<Playlist>,
}

impl YearBucket {
    fn validate(raw: RawYear) -> Result<Self> {
        Ok(Self {
            spring: validate_playlists(raw.spring)?,
            summer: validate_playlists(raw.summer)?,
            autumn: validate_playlists(raw.autumn)?,
            winter: validate_playlists(raw.winter)?,
        })
    }

    /// Playlists for a season, in source-file order (empty when absent)
    pub fn season(&self, season: Season) -> &[Playlist] {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Autumn => &self.autumn,
            Season::Winter => &self.winter,
        }
    }
}

fn validate_playlists(raw: Option<Vec<RawPlaylist>>) -> Result<Vec<Playlist>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.into_iter().map(Playlist::validate).collect()
}

/// The full legacy document, validated and immutable after load
#[derive(Debug, Clone, Default)]
pub struct Archive {
    years: BTreeMap<u16, YearBucket>,
}

impl Archive {
    /// Read and validate the archive file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse and validate archive text
    pub fn parse(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawYear> = serde_yaml::from_str(text)?;
        let mut years = BTreeMap::new();
        for (key, raw_year) in raw {
            years.insert(parse_year_key(&key)?, YearBucket::validate(raw_year)?);
        }
        Ok(Self { years })
    }

    /// Years in ascending numeric order
    pub fn years(&self) -> impl Iterator<Item = (u16, &YearBucket)> {
        self.years.iter().map(|(year, bucket)| (*year, bucket))
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }
}

fn parse_year_key(key: &str) -> Result<u16> {
    if key.len() == 4 && key.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(year) = key.parse() {
            return Ok(year);
        }
    }
    Err(Error::InvalidDocument(format!(
        "year key {key:?} is not a 4-digit number"
    )))
}

// Raw serde shapes, mirroring the YAML exactly

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawYear {
    spring: Option<Vec<RawPlaylist>>,
    summer: Option<Vec<RawPlaylist>>,
    autumn: Option<Vec<RawPlaylist>>,
    winter: Option<Vec<RawPlaylist>>,
}

type RawPlaylist = BTreeMap<String, Vec<RawWork>>;

#[derive(Debug, Deserialize)]
struct RawWork {
    title: Option<String>,
    album: Option<String>,
    artist: Option<String>,
    links: Option<Links>,
}
