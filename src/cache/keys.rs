//! Cache key derivation.
//!
//! Every key in the feed namespace is the literal `posts-feed` prefix
//! followed by a colon-delimited, ordered list of parameter values. Absent
//! parameters render as a fixed sentinel instead of being omitted, so the
//! key shape never varies with which optional parameters were supplied.
//! The shared prefix is what makes coarse prefix-based invalidation work.

use uuid::Uuid;

/// Namespace prefix shared by every cached feed payload.
pub const FEED_NAMESPACE: &str = "posts-feed";

/// Rendering of an absent optional parameter.
const ABSENT: &str = "-";

/// Prefix handed to `delete_by_prefix` to purge the whole namespace.
pub fn feed_purge_prefix() -> String {
    format!("{FEED_NAMESPACE}:")
}

/// Key for one page of the feed listing.
///
/// Two logically identical queries always map to the same key; queries
/// differing in search text, offset, limit, or viewer map to distinct keys.
pub fn feed_page(search: Option<&str>, offset: u32, limit: u32, viewer: Option<Uuid>) -> String {
    let search = match search {
        Some(text) => escape_segment(text),
        None => ABSENT.to_string(),
    };
    let viewer = match viewer {
        Some(id) => id.to_string(),
        None => ABSENT.to_string(),
    };
    format!("{FEED_NAMESPACE}:{search}:{offset}:{limit}:{viewer}")
}

/// Key for a single-post detail read.
///
/// Detail payloads share the listing namespace so that one coarse purge
/// invalidates both shapes.
pub fn post_detail(post_id: Uuid, viewer: Option<Uuid>) -> String {
    let viewer = match viewer {
        Some(id) => id.to_string(),
        None => ABSENT.to_string(),
    };
    format!("{FEED_NAMESPACE}:detail:{post_id}:{viewer}")
}

/// Escape a caller-supplied segment so an embedded delimiter can never
/// shift later segments and collide two different queries.
fn escape_segment(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ':' => escaped.push_str("\\:"),
            other => escaped.push(other),
        }
    }
    escaped
}
