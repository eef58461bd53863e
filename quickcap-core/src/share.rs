//! Share links carrying the whole collection in the URL fragment.
//!
//! `<base>#data=<payload>` where the payload is the JSON document
//! `{items, tags, updated_at}`, percent-encoded the way browsers'
//! `encodeURIComponent` does it and then base64-encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};
use crate::item::{Item, TagSet};
use crate::store::Snapshot;

/// Longest link we hand out. Longer URLs get truncated by some browsers.
pub const MAX_LINK_LEN: usize = 2000;

const FRAGMENT_PREFIX: &str = "#data=";

/// Everything `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Serialize)]
struct OutgoingPayload<'a> {
    items: &'a [Item],
    tags: &'a TagSet,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct IncomingPayload {
    items: Option<Vec<Item>>,
    tags: Option<TagSet>,
}

/// Build a share link for `snapshot` under `base_url`.
///
/// Any existing fragment on `base_url` is dropped.
pub fn encode_link(base_url: &str, snapshot: &Snapshot, now: DateTime<Utc>) -> CaptureResult<String> {
    let json = serde_json::to_string(&OutgoingPayload {
        items: &snapshot.items,
        tags: &snapshot.tags,
        updated_at: now,
    })?;
    let escaped = utf8_percent_encode(&json, URI_COMPONENT).to_string();
    let payload = STANDARD.encode(escaped);

    let base = base_url.split('#').next().unwrap_or(base_url);
    let link = format!("{}{}{}", base, FRAGMENT_PREFIX, payload);

    if link.len() > MAX_LINK_LEN {
        return Err(CaptureError::Serialization(format!(
            "Too much data for URL sharing ({} characters, limit {}). Use a JSON backup instead.",
            link.len(),
            MAX_LINK_LEN
        )));
    }
    Ok(link)
}

/// Read a share link (or just its `#data=` fragment) back into a snapshot.
///
/// Fields missing from the payload come back empty.
pub fn decode_link(link: &str) -> CaptureResult<Snapshot> {
    let start = link
        .find(FRAGMENT_PREFIX)
        .ok_or_else(|| CaptureError::Parse("Link has no #data= fragment".into()))?;
    let payload = &link[start + FRAGMENT_PREFIX.len()..];

    let escaped = STANDARD
        .decode(payload.trim())
        .map_err(|e| CaptureError::Parse(format!("Link payload is not base64: {}", e)))?;
    let escaped = String::from_utf8(escaped)
        .map_err(|_| CaptureError::Parse("Link payload is not text".into()))?;
    let json = percent_decode_str(&escaped)
        .decode_utf8()
        .map_err(|_| CaptureError::Parse("Link payload is not valid UTF-8".into()))?;

    let data: IncomingPayload = serde_json::from_str(&json)
        .map_err(|e| CaptureError::Parse(format!("Link payload is not valid JSON: {}", e)))?;

    Ok(Snapshot {
        items: data.items.unwrap_or_default(),
        tags: data.tags.unwrap_or_default(),
    })
}
