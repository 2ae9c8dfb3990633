use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Budget used when the caller does not supply a usable one.
pub const DEFAULT_BUDGET: u64 = 1000;

/// Menu identifiers are integers in the upstream dataset, but some mirrors
/// publish them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuId::Number(n) => write!(f, "{}", n),
            MenuId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_zh: String,
    pub price: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_with_tax: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calorie: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub salt: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_zh: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_alcohol: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pre_id: String,
}

/// Upstream rows sometimes carry `null` for optional fields; treat it as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MenuItem {
    /// Minimal constructor, mostly for tests and tools.
    pub fn new(id: i64, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: MenuId::Number(id),
            name: name.into(),
            name_en: String::new(),
            name_zh: String::new(),
            price,
            price_with_tax: price,
            calorie: 0,
            salt: 0.0,
            category: String::new(),
            category_en: String::new(),
            category_zh: String::new(),
            genre: String::new(),
            is_alcohol: false,
            icon: String::new(),
            pre_id: String::new(),
        }
    }
}

/// Menu document as published upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub menus: Vec<MenuItem>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Immutable point-in-time menu. Replaced wholesale on refresh.
#[derive(Debug, Clone, Default)]
pub struct MenuSnapshot {
    items: Vec<MenuItem>,
    last_updated: Option<DateTime<Utc>>,
}

impl MenuSnapshot {
    pub fn new(items: Vec<MenuItem>, last_updated: Option<DateTime<Utc>>) -> Self {
        Self {
            items,
            last_updated,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

impl From<MenuInfo> for MenuSnapshot {
    fn from(info: MenuInfo) -> Self {
        Self::new(info.menus, info.last_updated)
    }
}

/// Yen amount a caller asks to spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget(u64);

impl Budget {
    pub fn new(yen: u64) -> Self {
        Self(yen)
    }

    /// Reads the budget from post content such as `"gacha 500"`.
    ///
    /// Only content with exactly two whitespace separated tokens carries a
    /// budget. Negative or unparsable amounts fall back to the default.
    pub fn from_content(content: &str) -> Self {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() != 2 {
            return Self::default();
        }

        match tokens[1].parse::<i64>() {
            Ok(yen) if yen >= 0 => Self(yen as u64),
            _ => Self::default(),
        }
    }

    pub fn yen(&self) -> u64 {
        self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self(DEFAULT_BUDGET)
    }
}

/// Items drawn in one gacha session, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub items: Vec<MenuItem>,
    pub spent: u64,
    pub remaining: u64,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

pub type Tag = Vec<String>;

/// Builds a tag from string slices, e.g. `tag(&["p", pubkey])`.
pub fn tag(parts: &[&str]) -> Tag {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Signed Nostr event as exchanged on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u64,
    pub tags: Vec<Tag>,
    pub content: String,
    pub sig: String,
}

impl Event {
    /// Tags whose first element equals `key`.
    pub fn tags_with_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.first().map(String::as_str) == Some(key))
    }
}

/// Event content before an id and signature are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedEvent {
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u64,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Appends a tag unless an identical one is already present.
    pub fn push_unique_tag(&mut self, tag: Tag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Canonical `[0, pubkey, created_at, kind, tags, content]` serialization.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&serde_json::json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content
        ]))
    }

    /// SHA-256 of the canonical serialization; hex of this is the event id.
    pub fn digest(&self) -> serde_json::Result<[u8; 32]> {
        let canonical = self.canonical_json()?;
        Ok(Sha256::digest(canonical.as_bytes()).into())
    }

    pub fn into_event(self, id: String, sig: String) -> Event {
        Event {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        }
    }
}
