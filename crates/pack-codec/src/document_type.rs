//! Document types a pack can hold

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The kind of document stored in a pack.
///
/// The tag decides how records are keyed in data form: every record key is
/// `!<collection>!<_id>`, where the collection comes from
/// [`DocumentType::collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Actor,
    Adventure,
    Cards,
    ChatMessage,
    Combat,
    FogExploration,
    Folder,
    Item,
    JournalEntry,
    Macro,
    Playlist,
    RollTable,
    Scene,
    Setting,
    User,
}

impl DocumentType {
    /// Every known document type, in declaration order.
    pub const ALL: [DocumentType; 15] = [
        Self::Actor,
        Self::Adventure,
        Self::Cards,
        Self::ChatMessage,
        Self::Combat,
        Self::FogExploration,
        Self::Folder,
        Self::Item,
        Self::JournalEntry,
        Self::Macro,
        Self::Playlist,
        Self::RollTable,
        Self::Scene,
        Self::Setting,
        Self::User,
    ];

    /// The tag as written in a module manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::Adventure => "Adventure",
            Self::Cards => "Cards",
            Self::ChatMessage => "ChatMessage",
            Self::Combat => "Combat",
            Self::FogExploration => "FogExploration",
            Self::Folder => "Folder",
            Self::Item => "Item",
            Self::JournalEntry => "JournalEntry",
            Self::Macro => "Macro",
            Self::Playlist => "Playlist",
            Self::RollTable => "RollTable",
            Self::Scene => "Scene",
            Self::Setting => "Setting",
            Self::User => "User",
        }
    }

    /// Collection name used in data-form record keys.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Actor => "actors",
            Self::Adventure => "adventures",
            Self::Cards => "cards",
            Self::ChatMessage => "messages",
            Self::Combat => "combats",
            Self::FogExploration => "fog",
            Self::Folder => "folders",
            Self::Item => "items",
            Self::JournalEntry => "journal",
            Self::Macro => "macros",
            Self::Playlist => "playlists",
            Self::RollTable => "tables",
            Self::Scene => "scenes",
            Self::Setting => "settings",
            Self::User => "users",
        }
    }

    /// Data-form key for a record id.
    pub fn record_key(&self, id: &str) -> String {
        format!("!{}!{}", self.collection(), id)
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownDocumentType(s.to_string()))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
