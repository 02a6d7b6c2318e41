use std::path::PathBuf;

use serde::Deserialize;

use crate::click::ClickDisambiguator;
use crate::codec;
use crate::store::GradeStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub store: GradeStore,
    pub clicks: ClickDisambiguator,
    /// Directory holding the persisted document. The file name itself is
    /// fixed; only the directory is selectable.
    pub workspace: PathBuf,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: GradeStore::new(),
            clicks: ClickDisambiguator::new(),
            workspace: PathBuf::from("."),
        }
    }

    pub fn grades_path(&self) -> PathBuf {
        self.workspace.join(codec::GRADES_FILE)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
