//! Conversation data structures

use serde::{Deserialize, Serialize};

use super::role::{to_store_role, ApiRole, StoreRole};

/// One persisted turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Store-side role
    pub role: StoreRole,
    /// Turn text, possibly empty
    pub content: String,
    /// Opaque annotation; always written as null
    #[serde(default)]
    pub refusal: Option<serde_json::Value>,
}

impl ConversationEntry {
    /// Create a new entry with no refusal annotation
    pub fn new(role: StoreRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            refusal: None,
        }
    }

    /// Create an entry from an API-side role
    pub fn from_api(role: ApiRole, content: impl Into<String>) -> Self {
        Self::new(to_store_role(role), content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(StoreRole::System, content)
    }

    pub fn master(content: impl Into<String>) -> Self {
        Self::new(StoreRole::Master, content)
    }

    pub fn consciousness(content: impl Into<String>) -> Self {
        Self::new(StoreRole::Consciousness, content)
    }

    /// Role of this entry in the API vocabulary
    pub fn api_role(&self) -> ApiRole {
        self.role.into()
    }
}

/// The full persisted record, in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    pub conversation: Vec<ConversationEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conversation.len()
    }

    pub fn push(&mut self, entry: ConversationEntry) {
        self.conversation.push(entry);
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.conversation.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversationEntry> {
        self.conversation.iter()
    }
}

impl std::ops::Index<usize> for ConversationLog {
    type Output = ConversationEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.conversation[index]
    }
}
