use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every kind of content that can carry a local draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Page,
    About,
    Contact,
    HomeLayout,
    WorkIndex,
    JournalIndex,
    Project,
    JournalPost,
    Profile,
}

impl ContentKind {
    pub const ALL: [ContentKind; 9] = [
        ContentKind::Page,
        ContentKind::About,
        ContentKind::Contact,
        ContentKind::HomeLayout,
        ContentKind::WorkIndex,
        ContentKind::JournalIndex,
        ContentKind::Project,
        ContentKind::JournalPost,
        ContentKind::Profile,
    ];

    /// Stable name used in storage keys and change ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Page => "page",
            ContentKind::About => "about",
            ContentKind::Contact => "contact",
            ContentKind::HomeLayout => "home",
            ContentKind::WorkIndex => "work-index",
            ContentKind::JournalIndex => "journal-index",
            ContentKind::Project => "project",
            ContentKind::JournalPost => "journal",
            ContentKind::Profile => "profile",
        }
    }

    /// Multi-instance kinds embed the entity id in their draft key.
    pub fn is_multi_instance(&self) -> bool {
        matches!(
            self,
            ContentKind::Page | ContentKind::Project | ContentKind::JournalPost
        )
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown content kind: {0}")]
pub struct ParseContentKindError(String);

impl FromStr for ContentKind {
    type Err = ParseContentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseContentKindError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip_through_from_str() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.as_str().parse::<ContentKind>().unwrap(), kind);
        }
        assert!("gallery".parse::<ContentKind>().is_err());
    }
}
