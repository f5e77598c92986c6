use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque itinerary identifier. Numeric ids from older exports are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawItineraryId")]
pub struct ItineraryId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItineraryId {
    Number(u64),
    Text(String),
}

impl From<RawItineraryId> for ItineraryId {
    fn from(raw: RawItineraryId) -> Self {
        match raw {
            RawItineraryId::Number(n) => ItineraryId(n.to_string()),
            RawItineraryId::Text(s) => ItineraryId(s),
        }
    }
}

impl From<&str> for ItineraryId {
    fn from(value: &str) -> Self {
        ItineraryId(value.to_string())
    }
}

impl fmt::Display for ItineraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: ItineraryId,
    pub title: String,
    /// Free-form tag text, e.g. `"beach,summer"`. Matched as a whole string.
    #[serde(default)]
    pub tags: String,
    pub date: NaiveDate,
}

/// Reference to the profile picture: a URL, a `file://` path or an asset handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub nickname: String,
    #[serde(rename = "profileImage")]
    pub profile_image: ImageRef,
}

/// Values a profile falls back to when nothing usable is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDefaults {
    pub nickname: String,
    pub avatar: ImageRef,
}

pub const DEFAULT_NICKNAME: &str = "no nickname set";
pub const DEFAULT_AVATAR: &str = "asset://icon_userprofile.png";

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            avatar: ImageRef(DEFAULT_AVATAR.to_string()),
        }
    }
}

impl ProfileDefaults {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            nickname: self.nickname.clone(),
            profile_image: self.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    #[serde(alias = "latest")]
    Newest,
    Oldest,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" | "latest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            other => Err(format!(
                "unknown sort mode '{}', expected 'newest' or 'oldest'",
                other
            )),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Newest => f.write_str("newest"),
            SortMode::Oldest => f.write_str("oldest"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub search_term: String,
    pub sort_mode: SortMode,
}

/// What the calendar widget hands over: one instant, or an ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Single(NaiveDateTime),
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}
