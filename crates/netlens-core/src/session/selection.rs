//! The database file / capture session the operator is looking at.

use serde::{Deserialize, Serialize};

use crate::query::ResourceKey;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSelection {
    pub db_file: Option<String>,
    pub session_id: Option<String>,
}

impl SessionSelection {
    pub fn new(db_file: Option<String>, session_id: Option<String>) -> Self {
        Self {
            db_file,
            session_id,
        }
    }

    /// Switches database file. The session belongs to the old file, so it
    /// is dropped. Returns whether anything changed.
    pub fn select_db_file(&mut self, db_file: Option<String>) -> bool {
        if self.db_file == db_file {
            return false;
        }
        self.db_file = db_file;
        self.session_id = None;
        true
    }

    /// Selects `session_id`, or deselects it when it is already selected.
    pub fn toggle_session(&mut self, session_id: impl Into<String>) {
        let session_id = session_id.into();
        if self.session_id.as_deref() == Some(session_id.as_str()) {
            self.session_id = None;
        } else {
            self.session_id = Some(session_id);
        }
    }

    pub fn set_session(&mut self, session_id: Option<String>) {
        self.session_id = session_id;
    }

    /// The resource identity session-scoped fetches should be bound to, if
    /// a session is selected.
    pub fn resource_key(&self) -> Option<ResourceKey> {
        self.session_id
            .as_ref()
            .map(|id| ResourceKey::new(self.db_file.clone(), id.clone()))
    }
}
