//! Player name canonicalization.
//!
//! Callers may write a tag as `Name#1234` or `Name-1234`. A [`PlayerLookup`]
//! turns that into the canonical dash form used for career page URLs and
//! cache keys, together with the cosmetic ids the search endpoint reports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::fetcher::{build_client, join_segment, parse_base};
use crate::{Error, Result};

/// A resolved player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    /// Canonical tag, `Name-1234`
    #[serde(rename = "playerTag")]
    pub tag: String,
    /// Name card id, empty when unknown
    #[serde(rename = "playerNameCardID")]
    pub name_card_id: String,
    /// Portrait id, empty when unknown
    #[serde(rename = "playerIconID")]
    pub icon_id: String,
}

/// Resolves a caller-supplied tag to a [`PlayerIdentity`].
#[async_trait]
pub trait PlayerLookup: Send + Sync {
    /// `Ok(None)` when no such player exists.
    async fn lookup(&self, tag: &str) -> Result<Option<PlayerIdentity>>;
}

/// Uses the tag as given, only converting `#` to `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLookup;

#[async_trait]
impl PlayerLookup for PassthroughLookup {
    async fn lookup(&self, tag: &str) -> Result<Option<PlayerIdentity>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(None);
        }
        Ok(Some(PlayerIdentity {
            tag: tag.replace('#', "-"),
            name_card_id: String::new(),
            icon_id: String::new(),
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    battle_tag: String,
    #[serde(default)]
    namecard: Option<Value>,
    #[serde(default)]
    portrait: Option<Value>,
}

/// Account search against the upstream name search endpoint.
pub struct NameSearch {
    client: Client,
    base: Url,
}

impl NameSearch {
    /// Creates a lookup against the given search base URL
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base: parse_base(base)?,
        })
    }

    /// Search URL for the name part of `tag`
    pub fn search_url(&self, tag: &str) -> Result<Url> {
        let battle_tag = battle_tag(tag);
        let name = battle_tag.split('#').next().unwrap_or_default();
        join_segment(&self.base, name)
    }
}

#[async_trait]
impl PlayerLookup for NameSearch {
    async fn lookup(&self, tag: &str) -> Result<Option<PlayerIdentity>> {
        let wanted = battle_tag(tag);
        if wanted.is_empty() {
            return Ok(None);
        }

        let url = self.search_url(tag)?;
        debug!("Searching {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let results: Vec<SearchResult> = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("name search response: {e}")))?;

        let Some(found) = results.into_iter().find(|r| r.battle_tag == wanted) else {
            info!("No account matches {}", wanted);
            return Ok(None);
        };
        Ok(Some(PlayerIdentity {
            tag: found.battle_tag.replace('#', "-"),
            name_card_id: id_string(found.namecard.as_ref()),
            icon_id: id_string(found.portrait.as_ref()),
        }))
    }
}

/// `Name-1234` → `Name#1234`; a tag already containing `#` is kept.
fn battle_tag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.contains('#') {
        return tag.to_string();
    }
    match tag.rsplit_once('-') {
        Some((name, discriminator)) => format!("{name}#{discriminator}"),
        None => tag.to_string(),
    }
}

fn id_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
