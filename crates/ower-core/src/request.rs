//! Parsing of raw request parameters.
//!
//! Outer layers receive parameters as optional strings; these helpers give
//! them one interpretation everywhere.

use crate::catalog::{GameMode, Platform};
use crate::{Error, Result};

/// `forceRefresh`: only the literal `true`, in any case, enables it.
pub fn parse_force_refresh(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// The subject tag, which must be present and non-blank.
pub fn require_tag(value: Option<&str>) -> Result<&str> {
    match value.map(str::trim) {
        Some(tag) if !tag.is_empty() => Ok(tag),
        _ => Err(Error::InvalidParameter("playerTag is required".into())),
    }
}

/// Platform name, PC when absent.
pub fn parse_platform(value: Option<&str>) -> Result<Platform> {
    value.map_or(Ok(Platform::Pc), str::parse)
}

/// Game mode name, quick play when absent.
pub fn parse_mode(value: Option<&str>) -> Result<GameMode> {
    value.map_or(Ok(GameMode::QuickPlay), str::parse)
}
