//! Cookie-backed session persistence.
//!
//! The session is stored as `base64-<base64url(JSON)>` under the storage key.
//! Values longer than [`MAX_CHUNK_SIZE`] are split across `<key>.0`,
//! `<key>.1`, ... Every cookie written is scoped to `Path=/`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use tracing::{debug, warn};

use super::session::Session;
use super::token::decode_segment;

/// Largest cookie value written before splitting into chunks.
pub const MAX_CHUNK_SIZE: usize = 3180;

/// 400 days, the longest lifetime browsers accept.
const COOKIE_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

const BASE64_PREFIX: &str = "base64-";

/// A `Set-Cookie` instruction produced while handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub max_age: i64,
    pub path: String,
}

impl SetCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: COOKIE_MAX_AGE_SECS,
            path: "/".to_string(),
        }
    }

    pub fn removal(name: impl Into<String>) -> Self {
        Self {
            max_age: 0,
            ..Self::new(name, "")
        }
    }

    pub fn is_removal(&self) -> bool {
        self.max_age <= 0
    }

    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Path={}; Max-Age={}; SameSite=Lax",
            self.name, self.value, self.path, self.max_age
        )
    }
}

/// Request-scoped cookie view: what the browser sent, overlaid with what
/// this request has written so far.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    incoming: Vec<(String, String)>,
    pending: Vec<SetCookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header (`a=1; b=2`).
    pub fn from_header(header: &str) -> Self {
        let incoming = header
            .split(';')
            .filter_map(|part| {
                let (name, value) = part.trim().split_once('=')?;
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.to_string()))
            })
            .collect();
        Self {
            incoming,
            pending: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(written) = self.pending.iter().rev().find(|c| c.name == name) {
            return if written.is_removal() {
                None
            } else {
                Some(written.value.as_str())
            };
        }
        self.incoming
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Current cookies as the rest of this request sees them.
    pub fn get_all(&self) -> Vec<(String, String)> {
        let mut names: Vec<&str> = self.incoming.iter().map(|(n, _)| n.as_str()).collect();
        for written in &self.pending {
            if !names.contains(&written.name.as_str()) {
                names.push(&written.name);
            }
        }
        names
            .into_iter()
            .filter_map(|n| self.get(n).map(|v| (n.to_string(), v.to_string())))
            .collect()
    }

    /// Queue cookies for the response. The path is always forced to `/`.
    pub fn set_all(&mut self, cookies: impl IntoIterator<Item = SetCookie>) {
        for mut cookie in cookies {
            cookie.path = "/".to_string();
            self.pending.retain(|c| c.name != cookie.name);
            self.pending.push(cookie);
        }
    }

    pub fn pending(&self) -> &[SetCookie] {
        &self.pending
    }

    pub fn take_pending(&mut self) -> Vec<SetCookie> {
        std::mem::take(&mut self.pending)
    }
}

fn chunk_name(key: &str, index: usize) -> String {
    format!("{}.{}", key, index)
}

/// Whole stored value under `key`, joined from chunks when necessary.
fn read_combined(jar: &CookieJar, key: &str) -> Option<String> {
    if let Some(value) = jar.get(key) {
        return Some(value.to_string());
    }
    let mut combined = String::new();
    let mut index = 0;
    while let Some(chunk) = jar.get(&chunk_name(key, index)) {
        combined.push_str(chunk);
        index += 1;
    }
    if index == 0 {
        None
    } else {
        Some(combined)
    }
}

/// Names currently present under `key`, chunked or not.
fn existing_names(jar: &CookieJar, key: &str) -> Vec<String> {
    let chunk_prefix = format!("{}.", key);
    jar.get_all()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| {
            name == key
                || name
                    .strip_prefix(&chunk_prefix)
                    .map(|rest| rest.chars().all(|c| c.is_ascii_digit()))
                    .unwrap_or(false)
        })
        .collect()
}

fn decode_value(raw: &str) -> Option<String> {
    match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => String::from_utf8(decode_segment(encoded)?).ok(),
        None => Some(raw.to_string()),
    }
}

fn write_value(jar: &mut CookieJar, key: &str, value: &str) {
    let encoded = format!("{}{}", BASE64_PREFIX, URL_SAFE_NO_PAD.encode(value));

    let mut writes: Vec<SetCookie> = if encoded.len() <= MAX_CHUNK_SIZE {
        vec![SetCookie::new(key, encoded.as_str())]
    } else {
        // base64 output is ASCII, so byte chunks are char chunks
        encoded
            .as_bytes()
            .chunks(MAX_CHUNK_SIZE)
            .enumerate()
            .map(|(i, chunk)| SetCookie::new(chunk_name(key, i), String::from_utf8_lossy(chunk)))
            .collect()
    };

    let written: Vec<String> = writes.iter().map(|c| c.name.clone()).collect();
    for stale in existing_names(jar, key) {
        if !written.contains(&stale) {
            writes.push(SetCookie::removal(stale));
        }
    }
    jar.set_all(writes);
}

fn remove_value(jar: &mut CookieJar, key: &str) {
    let removals: Vec<SetCookie> = existing_names(jar, key)
        .into_iter()
        .map(SetCookie::removal)
        .collect();
    jar.set_all(removals);
}

/// Reads and writes the session cookies for one storage key.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    key: String,
}

impl SessionCookies {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            key: storage_key.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    fn verifier_key(&self) -> String {
        format!("{}-code-verifier", self.key)
    }

    /// Stored session, if present and decodable. Undecodable cookies are
    /// treated as no session.
    pub fn load(&self, jar: &CookieJar) -> Option<Session> {
        let raw = read_combined(jar, &self.key)?;
        let Some(json) = decode_value(&raw) else {
            warn!(key = %self.key, "Session cookie is not valid base64");
            return None;
        };
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to parse session cookie");
                None
            }
        }
    }

    pub fn store(&self, jar: &mut CookieJar, session: &Session) {
        match serde_json::to_string(session) {
            Ok(json) => write_value(jar, &self.key, &json),
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }

    pub fn clear(&self, jar: &mut CookieJar) {
        debug!(key = %self.key, "Clearing session cookies");
        remove_value(jar, &self.key);
    }

    /// PKCE code verifier saved when the sign-in link was requested.
    ///
    /// The stored value is a JSON string, optionally suffixed with
    /// `/<redirect type>`.
    pub fn load_code_verifier(&self, jar: &CookieJar) -> Option<String> {
        let raw = decode_value(&read_combined(jar, &self.verifier_key())?)?;
        let stored = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::String(s)) => s,
            _ => raw,
        };
        let verifier = stored.split('/').next().unwrap_or_default();
        if verifier.is_empty() {
            None
        } else {
            Some(verifier.to_string())
        }
    }

    pub fn clear_code_verifier(&self, jar: &mut CookieJar) {
        remove_value(jar, &self.verifier_key());
    }
}
