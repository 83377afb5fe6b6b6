use serde::{Deserialize, Serialize};

pub const SEED_ADMIN_ID: &str = "admin";
pub const SEED_ADMIN_PASSWORD: &str = "admin";
pub const SEED_ADMIN_NAME: &str = "Administrator";

/// Operator account. The id doubles as the login name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: String,
    pub password: String,
    pub name: String,
}

impl AdminAccount {
    /// Account created through registration; display name is derived from the id.
    pub fn registered(id: &str, password: &str) -> Self {
        Self { id: id.to_string(), password: password.to_string(), name: format!("Admin {id}") }
    }

    /// The single admin present in a fresh store.
    pub fn seed() -> Self {
        Self {
            id: SEED_ADMIN_ID.into(),
            password: SEED_ADMIN_PASSWORD.into(),
            name: SEED_ADMIN_NAME.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_admin_name_uses_id() {
        let a = AdminAccount::registered("ops1", "pw");
        assert_eq!(a.name, "Admin ops1");
        assert_eq!(a.id, "ops1");
    }
}
