use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Identity of the account that owns this profile
    pub profile_owner: String,
    /// The game the user most recently joined
    pub game_id: Option<String>,
}

impl User {
    pub fn new(name: String, profile_owner: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            profile_owner,
            game_id: None,
        }
    }
}
