use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trainee account. `id` is generated and immutable; `application_number`
/// is the user-facing login key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAccount {
    pub id: String,
    pub application_number: String,
    pub password: String,
    pub name: String,
    /// Unix milliseconds.
    pub joined_at: i64,
    #[serde(default)]
    pub completed_techniques: Vec<Value>,
    #[serde(default)]
    pub customer_sessions: Vec<Value>,
}

impl CandidateAccount {
    pub fn new(id: String, application_number: &str, password: &str, joined_at: i64) -> Self {
        Self {
            id,
            application_number: application_number.to_string(),
            password: password.to_string(),
            name: format!("Candidate {application_number}"),
            joined_at,
            completed_techniques: Vec::new(),
            customer_sessions: Vec::new(),
        }
    }
}

/// Candidate ids have the form `u_<unix-millis>`.
pub fn candidate_id(millis: i64) -> String {
    format!("u_{millis}")
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_fields() -> anyhow::Result<()> {
        let c = CandidateAccount::new(candidate_id(42), "A100", "p1", 42);
        let v = serde_json::to_value(&c)?;
        assert_eq!(v["id"], "u_42");
        assert_eq!(v["applicationNumber"], "A100");
        assert_eq!(v["name"], "Candidate A100");
        assert_eq!(v["joinedAt"], 42);
        assert_eq!(v["completedTechniques"], serde_json::json!([]));
        assert_eq!(v["customerSessions"], serde_json::json!([]));
        Ok(())
    }

    #[test]
    fn missing_sequences_default_to_empty() -> anyhow::Result<()> {
        let raw = r#"{"id":"u_1","applicationNumber":"A1","password":"x","name":"Candidate A1","joinedAt":1}"#;
        let c: CandidateAccount = serde_json::from_str(raw)?;
        assert!(c.completed_techniques.is_empty());
        assert!(c.customer_sessions.is_empty());
        Ok(())
    }
}
