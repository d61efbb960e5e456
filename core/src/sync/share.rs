//! Share tokens
//!
//! A share token carries the running timers of one tracker to another:
//! base64 over a compact JSON list of `{i: id, t: targetTime, f: floatSec}`.
//! Ids are matched as-is on the receiving side, so sharing only makes sense
//! between trackers seeded from the same boss list.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use super::ShareError;
use crate::store::EntityStore;
use crate::timers::{EntityId, EpochMillis, TrackedEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedTimer {
    #[serde(rename = "i")]
    pub id: EntityId,
    #[serde(rename = "t")]
    pub target_time: EpochMillis,
    #[serde(rename = "f", default)]
    pub float_secs: u32,
}

/// Encode every running timer.
pub fn encode_share_token(entities: &[TrackedEntity]) -> Result<String, ShareError> {
    let timers: Vec<SharedTimer> = entities
        .iter()
        .filter_map(|e| {
            e.target_time.map(|target_time| SharedTimer {
                id: e.id,
                target_time,
                float_secs: e.float_secs,
            })
        })
        .collect();

    if timers.is_empty() {
        return Err(ShareError::NothingToShare);
    }

    let json = serde_json::to_string(&timers).map_err(ShareError::Encode)?;
    Ok(STANDARD.encode(json))
}

pub fn decode_share_token(token: &str) -> Result<Vec<SharedTimer>, ShareError> {
    let bytes = STANDARD.decode(token.trim())?;
    serde_json::from_slice(&bytes).map_err(ShareError::Parse)
}

/// `<base>?share=<token>`
pub fn share_url(base: &str, token: &str) -> String {
    format!("{base}?share={token}")
}

/// Accept either a bare token or a URL carrying `share=<token>`.
///
/// Query strings decode `+` as a space, so spaces are mapped back. Browsers
/// may also percent-encode the base64 alphabet (`%2B`, `%2F`, `%3D`).
pub fn extract_share_token(input: &str) -> String {
    let input = input.trim();
    let token = match input.split_once("share=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or(rest),
        None => input,
    };
    let token = token.replace(' ', "+");
    match percent_decode_str(&token).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => token,
    }
}

/// Overwrite matching bosses' timers and force them visible.
/// Returns the ids that matched; unknown ids are ignored.
pub fn apply_shared_timers(store: &mut EntityStore, timers: &[SharedTimer]) -> Vec<EntityId> {
    let mut applied = Vec::new();
    for timer in timers {
        let Some(entity) = store.get_mut(timer.id) else {
            tracing::debug!(id = timer.id, "Shared timer for unknown boss ignored");
            continue;
        };
        entity.start_cycle(timer.target_time, timer.float_secs);
        store.force_visible(timer.id);
        applied.push(timer.id);
    }
    applied
}
