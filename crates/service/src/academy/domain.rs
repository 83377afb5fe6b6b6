use models::{AdminAccount, CandidateAccount};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Which account bucket a request targets.
///
/// Only the exact string `"admin"` selects admins; any other value, or no
/// value at all, means candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Candidate,
}

impl<'de> Deserialize<'de> for Role {
    /// Never fails: `null`, numbers, objects and unknown strings are all candidate.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Role::from(s.as_str()),
            _ => Role::Candidate,
        })
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        if s == "admin" { Role::Admin } else { Role::Candidate }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Candidate => "candidate",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Admin id, or candidate id / application number.
    pub id: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    /// Reused as the admin id when registering an admin.
    pub application_number: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordInput {
    pub id: String,
    pub new_password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueCompletionInput {
    pub user_id: String,
    #[serde(default)]
    pub technique_data: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompletionInput {
    pub user_id: String,
    #[serde(default)]
    pub session_data: Value,
}

/// Admin as seen by clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminView {
    pub id: String,
    pub name: String,
}

impl From<&AdminAccount> for AdminView {
    fn from(a: &AdminAccount) -> Self {
        Self { id: a.id.clone(), name: a.name.clone() }
    }
}

/// Candidate as seen by clients: everything except the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub id: String,
    pub application_number: String,
    pub name: String,
    pub joined_at: i64,
    pub completed_techniques: Vec<Value>,
    pub customer_sessions: Vec<Value>,
}

impl From<&CandidateAccount> for CandidateView {
    fn from(c: &CandidateAccount) -> Self {
        Self {
            id: c.id.clone(),
            application_number: c.application_number.clone(),
            name: c.name.clone(),
            joined_at: c.joined_at,
            completed_techniques: c.completed_techniques.clone(),
            customer_sessions: c.customer_sessions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccountView {
    Admin(AdminView),
    Candidate(CandidateView),
}

/// Successful login: the account's public view plus its role tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedUser {
    #[serde(flatten)]
    pub account: AccountView,
    pub role: Role,
}

/// Outcome of a registration. Only candidates get a generated id back.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub role: Role,
    pub user_id: Option<String>,
}
