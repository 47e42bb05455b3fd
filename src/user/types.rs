use serde::Deserialize;

/// Request payload for creating a user profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub profile_owner: String,
}

/// Query for looking a profile up by its owning identity
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUserQuery {
    pub profile_owner: String,
}
