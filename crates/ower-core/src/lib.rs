//! # ower-core
//!
//! Core functionality for ower - a caching scraper for player career pages.
//!
//! The crate fetches a player's career page, keeps it in a local file cache and
//! extracts typed records from it: the profile summary, competitive ranks per
//! platform and role, hero rankings per stat category and per-hero stat blocks.
//!
//! ## Architecture
//!
//! - **Storage**: one file per player, replaced atomically ([`CacheStore`])
//! - **Fetching**: HTTP retrieval behind the [`DocumentSource`] trait ([`Fetcher`])
//! - **Coordination**: cache-or-fetch with single-flight fetches ([`CacheCoordinator`])
//! - **Cleanup**: TTL-based expiry driven by an injected trigger ([`CleanupSweeper`])
//! - **Extraction**: selector queries ([`DocumentView`]) feeding the [`extract`] functions
//! - **Service**: lookup, cache and extraction per request ([`ProfileService`])
//!
//! ## Quick Start
//!
//! ```rust
//! use ower_core::{extract, Document, GameMode, Outcome, Platform};
//!
//! let page = Document::parse(r#"<div class="error-contain">Profile Not Found</div>"#);
//! let rankings = extract::hero_rankings(&page, Platform::Pc, GameMode::QuickPlay, "games-won")?;
//! assert!(matches!(rankings, Outcome::NotFound));
//!
//! let err = extract::hero_rankings(&page, Platform::Pc, GameMode::QuickPlay, "bogus-type")
//!     .unwrap_err();
//! assert_eq!(err.category(), "invalid_parameter");
//! # Ok::<(), ower_core::Error>(())
//! ```

/// Platforms, modes, roles, stat categories and heroes
pub mod catalog;
/// Configuration loading and validation
pub mod config;
/// Cache-or-fetch resolution with single-flight fetches
pub mod coordinator;
/// Selector queries over parsed pages
pub mod document;
/// Error types and result aliases
pub mod error;
/// Typed record extraction
pub mod extract;
/// HTTP fetching of career pages
pub mod fetcher;
/// Player name canonicalization
pub mod lookup;
/// Raw request parameter parsing
pub mod request;
/// End-to-end request handling
pub mod service;
/// Local file cache of career pages
pub mod storage;
/// Cache expiry
pub mod sweeper;
/// Extracted record types
pub mod types;

// Re-export commonly used types
pub use catalog::{GameMode, Hero, HeroCatalog, Platform, Role, StatCategory, StatCategoryCatalog};
pub use config::{
    CacheConfig, Config, MAX_SCHEDULE_HOURS, MAX_TIMEOUT_SECS, SourceConfig,
};
pub use coordinator::{CacheCoordinator, DocumentOrigin, ResolvedDocument};
pub use document::{Document, DocumentView, Node};
pub use error::{Error, Result};
pub use fetcher::{DocumentSource, Fetcher};
pub use lookup::{NameSearch, PassthroughLookup, PlayerIdentity, PlayerLookup};
pub use service::{ProfileService, Response};
pub use storage::{CacheEntry, CacheKey, CacheStore, EntryInfo};
pub use sweeper::{CleanupSweeper, CleanupTrigger, IntervalTrigger, SweepReport, run_cleanup};
pub use types::*;
