use serde::{Deserialize, Serialize};
use sf_core::content::*;

/// Complete site content as stored in the content document.
///
/// The work and journal indexes are not stored separately: their order is
/// the order of `projects` and `journal`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSnapshot {
    pub pages: Vec<PageContent>,
    pub about: AboutContent,
    pub contact: ContactContent,
    pub home: HomeLayout,
    pub projects: Vec<Project>,
    pub journal: Vec<JournalPost>,
    pub profile: Profile,
    pub photos: Vec<Photo>,
}

impl ContentSnapshot {
    pub fn work_index(&self) -> WorkIndex {
        WorkIndex {
            projects: self.projects.clone(),
        }
    }

    pub fn journal_index(&self) -> JournalIndex {
        JournalIndex {
            posts: self.journal.clone(),
        }
    }
}
