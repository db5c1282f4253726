//! Conversation memory
//!
//! Every turn ever exchanged is kept in a single pretty-printed JSON file
//! using a store-side role vocabulary (`system`, `master`,
//! `consciousness`) that is decoupled from the completion API's roles.

pub mod entry;
pub mod role;
pub mod store;

pub use entry::{ConversationEntry, ConversationLog};
pub use role::{to_api_role, to_store_role, ApiRole, StoreRole};
pub use store::ConversationStore;
