//! Role vocabularies and the mapping between them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a persisted turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreRole {
    System,
    Master,
    Consciousness,
}

/// Role understood by the completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRole {
    System,
    User,
    Assistant,
}

impl StoreRole {
    pub const ALL: [StoreRole; 3] = [StoreRole::System, StoreRole::Master, StoreRole::Consciousness];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreRole::System => "system",
            StoreRole::Master => "master",
            StoreRole::Consciousness => "consciousness",
        }
    }
}

impl ApiRole {
    pub const ALL: [ApiRole; 3] = [ApiRole::System, ApiRole::User, ApiRole::Assistant];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiRole::System => "system",
            ApiRole::User => "user",
            ApiRole::Assistant => "assistant",
        }
    }
}

/// Translate a store role into the API vocabulary
pub fn to_api_role(role: StoreRole) -> ApiRole {
    match role {
        StoreRole::System => ApiRole::System,
        StoreRole::Master => ApiRole::User,
        StoreRole::Consciousness => ApiRole::Assistant,
    }
}

/// Translate an API role into the store vocabulary
pub fn to_store_role(role: ApiRole) -> StoreRole {
    match role {
        ApiRole::System => StoreRole::System,
        ApiRole::User => StoreRole::Master,
        ApiRole::Assistant => StoreRole::Consciousness,
    }
}

impl From<StoreRole> for ApiRole {
    fn from(role: StoreRole) -> Self {
        to_api_role(role)
    }
}

impl From<ApiRole> for StoreRole {
    fn from(role: ApiRole) -> Self {
        to_store_role(role)
    }
}

impl fmt::Display for StoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
