use crate::error::CoreError;
use async_trait::async_trait;
use reqwest::Client;

pub const CHAMPION_VERSIONS_URL: &str = "https://ddragon.leagueoflegends.com/api/versions.json";

#[must_use]
pub fn champion_catalog_url(version: &str) -> String {
    format!("http://ddragon.leagueoflegends.com/cdn/{version}/data/en_US/champion.json")
}

#[must_use]
pub fn match_history_url(summoner_id: &str) -> String {
    format!(
        "https://lol-web-api.op.gg/api/v1.0/internal/bypass/games/na/summoners/{summoner_id}?=&limit=20&hl=en_US&game_type=soloranked"
    )
}

/// Raw GET transport to the upstream APIs. A trait seam so orchestration
/// tests can serve canned payloads instead of hitting the network.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CoreError>;
}

pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CoreError> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}
