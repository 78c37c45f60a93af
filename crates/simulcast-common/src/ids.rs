//! Title identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier grouping every per-language view of one title.
///
/// Minted once, on the first sighting of a title name, and reused for that
/// exact name afterwards. Serialized as the hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(Uuid);

impl TitleId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TitleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TitleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Uuid> for TitleId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TitleId> for Uuid {
    fn from(id: TitleId) -> Self {
        id.0
    }
}
