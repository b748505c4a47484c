//! Notion API client
//!
//! Wraps the three remote operations the migration needs: create a playlist
//! page, query the playlists database by name, and create a work page.
//! Every HTTP call takes one permit from the shared rate limiter, so a work
//! creation costs two throttled calls (lookup + create).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::migrate::{PlaylistRecord, RecordStore, WorkRecord};
use crate::rate_limit::RateLimiter;

const NOTION_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const USER_AGENT: &str = concat!("grammophon-import/", env!("CARGO_PKG_VERSION"));

/// Client for the two Notion databases (playlists, works)
pub struct NotionClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    token: String,
    playlists_db_id: String,
    works_db_id: String,
}

impl NotionClient {
    pub fn new(
        token: String,
        playlists_db_id: String,
        works_db_id: String,
        rate_limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter,
            token,
            playlists_db_id,
            works_db_id,
        })
    }

    /// Throttled POST with Notion auth and version headers
    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.rate_limiter.wait().await;

        debug!(url = %url, "Posting to Notion API");

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Api(status.as_u16(), error_text));
        }

        response.json().await.map_err(|e| Error::Parse(e.to_string()))
    }

    /// Resolve the page id of the playlist with the given name.
    ///
    /// The lookup is global by name: zero matches and multiple matches are
    /// both fatal, distinct errors rather than a silent first match.
    pub async fn find_playlist_id(&self, name: &str) -> Result<String> {
        let url = format!("{}/databases/{}/query", NOTION_BASE_URL, self.playlists_db_id);
        let response = self.post(&url, &playlist_query(name)).await?;
        playlist_id_from_results(name, &response)
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn create_playlist(&self, record: &PlaylistRecord) -> Result<()> {
        let url = format!("{}/pages", NOTION_BASE_URL);
        let body = json!({
            "parent": { "database_id": self.playlists_db_id },
            "properties": playlist_properties(record),
        });

        let page = self.post(&url, &body).await?;

        info!(
            page_id = page.get("id").and_then(serde_json::Value::as_str).unwrap_or(""),
            playlist = %record.name,
            "Notion playlist page created"
        );
        Ok(())
    }

    async fn create_work(&self, record: &WorkRecord) -> Result<()> {
        let playlist_id = self.find_playlist_id(&record.playlist_name).await?;

        let url = format!("{}/pages", NOTION_BASE_URL);
        let body = json!({
            "parent": { "database_id": self.works_db_id },
            "properties": work_properties(record, &playlist_id),
        });

        let page = self.post(&url, &body).await?;

        info!(
            page_id = page.get("id").and_then(serde_json::Value::as_str).unwrap_or(""),
            work = %record.name,
            playlist_id = %playlist_id,
            "Notion work page created"
        );
        Ok(())
    }
}

/// Query body filtering the playlists database by exact title
fn playlist_query(name: &str) -> Value {
    json!({
        "filter": {
            "property": "Name",
            "title": { "equals": name }
        }
    })
}

/// Map query-result cardinality to an id or a distinct error
fn playlist_id_from_results(name: &str, response: &Value) -> Result<String> {
    let results = response
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Parse("query response missing results array".into()))?;

    match results.len() {
        0 => Err(Error::PlaylistNotFound(name.to_string())),
        1 => results[0]
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Parse("playlist page missing id".into())),
        count => Err(Error::PlaylistAmbiguous {
            name: name.to_string(),
            count,
        }),
    }
}

fn playlist_properties(record: &PlaylistRecord) -> Value {
    json!({
        "Name": title_property(&record.name),
        "Year": { "number": record.year },
        "Season": { "select": { "name": record.season.as_str() } },
        "Order": { "number": record.order },
    })
}

fn work_properties(record: &WorkRecord, playlist_id: &str) -> Value {
    let artists: Vec<Value> = record
        .artists
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();

    json!({
        "Name": title_property(&record.name),
        "Artist": { "multi_select": artists },
        "YouTube": { "url": record.youtube },
        "Spotify": { "url": record.spotify },
        "SoundCloud": { "url": record.soundcloud },
        "TikTok": { "checkbox": record.tiktok },
        "Douyin": { "checkbox": record.douyin },
        "Meme": { "checkbox": record.meme },
        "Classical": { "checkbox": record.classical },
        "Album": { "checkbox": record.album },
        "Order": { "number": record.order },
        "Playlist": { "relation": [{ "id": playlist_id }] },
    })
}

fn title_property(text: &str) -> Value {
    json!({
        "title": [{ "text": { "content": text } }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Season;

    fn sample_playlist() -> PlaylistRecord {
        PlaylistRecord {
            name: "chill mix".into(),
            year: 2021,
            season: Season::Winter,
            order: 10,
        }
    }

    fn sample_work() -> WorkRecord {
        WorkRecord {
            name: "Song A".into(),
            artists: vec!["X".into(), "Y".into()],
            playlist_name: "chill mix".into(),
            order: 100,
            youtube: String::new(),
            spotify: "https://open.spotify.com/track/a".into(),
            soundcloud: String::new(),
            tiktok: false,
            douyin: false,
            meme: true,
            classical: false,
            album: false,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = NotionClient::new(
            "secret".into(),
            "playlists-db".into(),
            "works-db".into(),
            Arc::new(RateLimiter::default()),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_playlist_properties_shape() {
        let props = playlist_properties(&sample_playlist());
        assert_eq!(
            props["Name"]["title"][0]["text"]["content"],
            json!("chill mix")
        );
        assert_eq!(props["Year"]["number"], json!(2021));
        assert_eq!(props["Season"]["select"]["name"], json!("winter"));
        assert_eq!(props["Order"]["number"], json!(10));
    }

    #[test]
    fn test_work_properties_shape() {
        let props = work_properties(&sample_work(), "page-123");
        assert_eq!(props["Name"]["title"][0]["text"]["content"], json!("Song A"));
        assert_eq!(
            props["Artist"]["multi_select"],
            json!([{ "name": "X" }, { "name": "Y" }])
        );
        assert_eq!(props["YouTube"]["url"], json!(""));
        assert_eq!(
            props["Spotify"]["url"],
            json!("https://open.spotify.com/track/a")
        );
        assert_eq!(props["Meme"]["checkbox"], json!(true));
        assert_eq!(props["TikTok"]["checkbox"], json!(false));
        assert_eq!(props["Album"]["checkbox"], json!(false));
        assert_eq!(props["Order"]["number"], json!(100));
        assert_eq!(props["Playlist"]["relation"], json!([{ "id": "page-123" }]));
    }

    #[test]
    fn test_playlist_query_shape() {
        let query = playlist_query("chill mix");
        assert_eq!(query["filter"]["property"], json!("Name"));
        assert_eq!(query["filter"]["title"]["equals"], json!("chill mix"));
    }

    #[test]
    fn test_lookup_empty_is_not_found() {
        let response = json!({ "results": [] });
        let result = playlist_id_from_results("chill mix", &response);
        assert!(matches!(result, Err(Error::PlaylistNotFound(name)) if name == "chill mix"));
    }

    #[test]
    fn test_lookup_single_match_returns_id() {
        let response = json!({ "results": [{ "id": "page-123" }] });
        let id = playlist_id_from_results("chill mix", &response).unwrap();
        assert_eq!(id, "page-123");
    }

    #[test]
    fn test_lookup_multiple_matches_is_ambiguous() {
        let response = json!({ "results": [{ "id": "a" }, { "id": "b" }] });
        let result = playlist_id_from_results("chill mix", &response);
        assert!(matches!(
            result,
            Err(Error::PlaylistAmbiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_lookup_missing_results_is_parse_error() {
        let response = json!({ "object": "error" });
        let result = playlist_id_from_results("chill mix", &response);
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
