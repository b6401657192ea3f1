//! Request-level glue: lookup, cache, parse, extract.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::Result;
use crate::catalog::{GameMode, HeroCatalog, Platform};
use crate::config::Config;
use crate::coordinator::{CacheCoordinator, DocumentOrigin};
use crate::document::Document;
use crate::extract;
use crate::fetcher::{DocumentSource, Fetcher};
use crate::lookup::{NameSearch, PlayerIdentity, PlayerLookup};
use crate::storage::CacheStore;
use crate::types::{HeroRankings, HeroStatBlock, Outcome, ProfileSummary};

/// An extracted record together with request metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    #[serde(flatten)]
    pub player: PlayerIdentity,
    #[serde(flatten)]
    pub data: T,
    /// Whether the caller asked for a forced refresh
    pub refresh_cache: bool,
    /// Whether the page was served from the cache
    pub cached: bool,
    /// Unix time in milliseconds
    pub current_time: i64,
}

/// Runs player requests end to end.
pub struct ProfileService<S: DocumentSource = Fetcher, L: PlayerLookup = NameSearch> {
    coordinator: CacheCoordinator<S>,
    lookup: L,
    heroes: Arc<HeroCatalog>,
}

impl ProfileService {
    /// Network-backed service from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = &config.source;
        let store = Arc::new(CacheStore::new(config.cache.dir.clone()));
        store.ensure_root()?;
        let fetcher = Fetcher::with_timeout(&source.data_source, source.timeout())?;
        let lookup = NameSearch::new(&source.name_search, source.timeout())?;
        let heroes = config.hero_catalog()?;
        Ok(Self::new(CacheCoordinator::new(store, Arc::new(fetcher)), lookup).with_heroes(heroes))
    }
}

impl<S: DocumentSource, L: PlayerLookup> ProfileService<S, L> {
    /// Service over an injected coordinator and lookup, with the built-in heroes.
    pub fn new(coordinator: CacheCoordinator<S>, lookup: L) -> Self {
        Self {
            coordinator,
            lookup,
            heroes: Arc::new(HeroCatalog::builtin().clone()),
        }
    }

    /// Replace the hero catalog.
    #[must_use]
    pub fn with_heroes(mut self, heroes: HeroCatalog) -> Self {
        self.heroes = Arc::new(heroes);
        self
    }

    /// The cache coordinator.
    pub const fn coordinator(&self) -> &CacheCoordinator<S> {
        &self.coordinator
    }

    /// The hero catalog.
    pub fn heroes(&self) -> &HeroCatalog {
        &self.heroes
    }

    /// Profile summary with both platforms' competitive ranks.
    #[instrument(skip(self))]
    pub async fn player_info(
        &self,
        tag: &str,
        force_refresh: bool,
    ) -> Result<Outcome<Response<ProfileSummary>>> {
        self.run(tag, force_refresh, |doc| Ok(extract::summary(doc)))
            .await
    }

    /// Hero rankings of one stat category.
    #[instrument(skip(self))]
    pub async fn hero_rankings(
        &self,
        tag: &str,
        platform: Platform,
        mode: GameMode,
        type_key: &str,
        force_refresh: bool,
    ) -> Result<Outcome<Response<HeroRankings>>> {
        mode.categories().resolve(type_key)?;
        self.run(tag, force_refresh, |doc| {
            extract::hero_rankings(doc, platform, mode, type_key)
        })
        .await
    }

    /// Detailed stats of one hero.
    #[instrument(skip(self))]
    pub async fn hero_stats(
        &self,
        tag: &str,
        platform: Platform,
        mode: GameMode,
        hero_id: &str,
        force_refresh: bool,
    ) -> Result<Outcome<Response<HeroStatBlock>>> {
        self.heroes.resolve(hero_id)?;
        let heroes = Arc::clone(&self.heroes);
        self.run(tag, force_refresh, move |doc| {
            extract::hero_stats(doc, platform, mode, &heroes, hero_id)
        })
        .await
    }

    async fn run<T>(
        &self,
        tag: &str,
        force_refresh: bool,
        extractor: impl FnOnce(&Document) -> Result<Outcome<T>>,
    ) -> Result<Outcome<Response<T>>> {
        let Some(player) = self.lookup.lookup(tag).await? else {
            info!("{} not found by lookup", tag);
            return Ok(Outcome::NotFound);
        };

        let resolved = self
            .coordinator
            .resolve_document(&player.tag, force_refresh)
            .await?;
        let cached = resolved.origin == DocumentOrigin::Cache;

        let outcome = extractor(&Document::parse(&resolved.content))?;
        if matches!(outcome, Outcome::NotFound) {
            info!("{} not found upstream", player.tag);
        }
        Ok(outcome.map(|data| Response {
            player,
            data,
            refresh_cache: force_refresh,
            cached,
            current_time: Utc::now().timestamp_millis(),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::extract::fixtures::{ERROR_PAGE, PUBLIC_PAGE};
    use crate::lookup::PassthroughLookup;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct StaticSource {
        page: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch_document(&self, _tag: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.page.to_string())
        }
    }

    struct NobodyLookup;

    #[async_trait]
    impl PlayerLookup for NobodyLookup {
        async fn lookup(&self, _tag: &str) -> Result<Option<PlayerIdentity>> {
            Ok(None)
        }
    }

    fn service<L: PlayerLookup>(
        page: &'static str,
        lookup: L,
    ) -> (ProfileService<StaticSource, L>, Arc<StaticSource>, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(CacheStore::new(temp.path().join("cache")));
        let source = Arc::new(StaticSource {
            page,
            calls: AtomicUsize::new(0),
        });
        let coordinator = CacheCoordinator::new(store, Arc::clone(&source));
        (ProfileService::new(coordinator, lookup), source, temp)
    }

    #[tokio::test]
    async fn test_player_info_then_cached() {
        let (service, source, _tmp) = service(PUBLIC_PAGE, PassthroughLookup);

        let first = service.player_info("Tester#1234", false).await.unwrap().found().unwrap();
        assert_eq!(first.player.tag, "Tester-1234");
        assert!(!first.cached);
        assert_eq!(first.data.header.display_name, "Tester");

        let second = service.player_info("Tester-1234", false).await.unwrap().found().unwrap();
        assert!(second.cached);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let refreshed = service.player_info("Tester-1234", true).await.unwrap().found().unwrap();
        assert!(refreshed.refresh_cache);
        assert!(!refreshed.cached);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_type_fails_before_fetch() {
        let (service, source, _tmp) = service(PUBLIC_PAGE, PassthroughLookup);
        let err = service
            .hero_rankings("Tester-1234", Platform::Pc, GameMode::QuickPlay, "bogus-type", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_hero_fails_before_fetch() {
        let (service, source, _tmp) = service(PUBLIC_PAGE, PassthroughLookup);
        let err = service
            .hero_stats("Tester-1234", Platform::Pc, GameMode::Competitive, "9999", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_hero_stats_with_builtin_catalog() {
        let (service, _source, _tmp) = service(PUBLIC_PAGE, PassthroughLookup);
        // Ana is heroID 22 in the built-in roster.
        let response = service
            .hero_stats("Tester-1234", Platform::Pc, GameMode::Competitive, "22", false)
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(response.data.hero_name, "Ana");
        assert_eq!(response.data.categories.len(), 2);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["playerTag"], "Tester-1234");
        assert_eq!(value["heroID"], 22);
        assert_eq!(value["gameMode"], "competitive");
        assert_eq!(value["platform"], "pc");
        assert_eq!(value["refreshCache"], false);
        assert!(value["currentTime"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_not_found_paths() {
        let (service, source, _tmp) = service(PUBLIC_PAGE, NobodyLookup);
        let outcome = service.player_info("Ghost-1", false).await.unwrap();
        assert!(matches!(outcome, Outcome::NotFound));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        let (service, _source, _tmp) = service_for_error();
        let outcome = service
            .hero_rankings("Ghost-1", Platform::Pc, GameMode::QuickPlay, "games-won", false)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::NotFound));
    }

    fn service_for_error()
    -> (ProfileService<StaticSource, PassthroughLookup>, Arc<StaticSource>, TempDir) {
        service(ERROR_PAGE, PassthroughLookup)
    }
}
