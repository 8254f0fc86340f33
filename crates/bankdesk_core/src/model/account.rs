//! Manager and client account records.
//!
//! Both tables share one shape; they stay distinct types so a manager row can
//! never be passed where a client row is expected.

use crate::auth::{hash_password, AuthResult};
use serde::{Deserialize, Serialize};

/// Row of the `managers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manager {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub login: String,
    /// Argon2id PHC string.
    pub password: String,
}

/// Row of the `clients` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub login: String,
    /// Argon2id PHC string.
    pub password: String,
}

/// Which account table a sign-in targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Manager,
    Client,
}

/// Insert request for a manager or client.
///
/// The password is hashed on construction; the plaintext is not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub surname: String,
    pub login: String,
    pub password_hash: String,
}

impl NewAccount {
    /// Builds an insert request, hashing `password` with a fresh salt.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        login: impl Into<String>,
        password: &str,
    ) -> AuthResult<Self> {
        Ok(Self {
            name: name.into(),
            surname: surname.into(),
            login: login.into(),
            password_hash: hash_password(password)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Manager, NewAccount};
    use crate::auth::verify_password;

    #[test]
    fn new_account_never_keeps_plaintext() {
        let account = NewAccount::new("Jack", "Jackson", "jack", "pass").unwrap();

        assert_ne!(account.password_hash, "pass");
        assert!(verify_password("pass", &account.password_hash).unwrap());
    }

    #[test]
    fn manager_serializes_with_legacy_field_names_in_order() {
        let manager = Manager {
            id: 1,
            name: "Admin".to_string(),
            surname: "Administrator".to_string(),
            login: "admin".to_string(),
            password: "$argon2id$hash".to_string(),
        };

        let json = serde_json::to_string(&manager).unwrap();
        assert_eq!(
            json,
            r#"{"Id":1,"Name":"Admin","Surname":"Administrator","Login":"admin","Password":"$argon2id$hash"}"#
        );
    }
}
