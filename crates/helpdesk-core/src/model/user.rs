use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

const DIGEST_PREFIX: &str = "blake3:";

/// Account role. Only `Client` sessions are scoped to their own tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Agent,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    /// Whether this role sees every ticket rather than only its own.
    #[must_use]
    pub const fn sees_all_tickets(self) -> bool {
        !matches!(self, Self::Client)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "client" => Ok(Self::Client),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

/// Stored password credential.
///
/// New accounts store `blake3:<hex>`. Values without the prefix are legacy
/// plaintext entries and are compared verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Digest a plaintext password for storage.
    #[must_use]
    pub fn from_plaintext(password: &str) -> Self {
        Self(format!(
            "{DIGEST_PREFIX}{}",
            blake3::hash(password.as_bytes()).to_hex()
        ))
    }

    /// Wrap a stored value exactly as found on disk.
    #[must_use]
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn is_legacy_plaintext(&self) -> bool {
        !self.0.starts_with(DIGEST_PREFIX)
    }

    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        match self.0.strip_prefix(DIGEST_PREFIX) {
            Some(hex) => blake3::hash(candidate.as_bytes()).to_hex().as_str() == hex,
            None => self.0 == candidate,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// A registered account as stored under `helpdesk_all_users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Absent on some older records. Such accounts cannot sign in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Credential>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Check `candidate` against the stored credential. No credential never matches.
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password
            .as_ref()
            .is_some_and(|credential| credential.verify(candidate))
    }

    /// The password-free view held by a session.
    #[must_use]
    pub fn to_session(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The user view stored in the session store. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Sign-up payload. The directory assigns the id and digests the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Credential, Role, SessionUser, User};
    use std::str::FromStr;

    #[test]
    fn digest_verifies_only_the_original_password() {
        let credential = Credential::from_plaintext("hunter2");
        assert!(!credential.is_legacy_plaintext());
        assert!(credential.verify("hunter2"));
        assert!(!credential.verify("Hunter2"));
        assert!(!credential.verify(""));
    }

    #[test]
    fn legacy_plaintext_is_compared_verbatim() {
        let credential = Credential::from_stored("password");
        assert!(credential.is_legacy_plaintext());
        assert!(credential.verify("password"));
        assert!(!credential.verify("password "));
    }

    #[test]
    fn credential_debug_does_not_leak() {
        let credential = Credential::from_stored("secret");
        assert_eq!(format!("{credential:?}"), "Credential(..)");
    }

    #[test]
    fn session_view_drops_password_field() {
        let user = User {
            id: 3,
            name: "Client User".into(),
            email: "client@example.com".into(),
            password: Some(Credential::from_plaintext("password")),
            role: Role::Client,
        };
        let json = serde_json::to_value(user.to_session()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "client");

        let back: SessionUser = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, 3);
    }

    #[test]
    fn legacy_user_json_reads_plaintext_password() {
        let raw = r#"{"id":1,"name":"Admin User","email":"admin@example.com","password":"password","role":"admin"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert!(user.password.as_ref().unwrap().is_legacy_plaintext());
        assert!(user.verify_password("password"));
        assert!(user.role.sees_all_tickets());
    }

    #[test]
    fn user_without_password_decodes_but_never_verifies() {
        let raw = r#"{"id":7,"name":"Old","email":"old@x.com","role":"agent"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert!(user.password.is_none());
        assert!(!user.verify_password(""));
        assert!(!user.verify_password("password"));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn role_parse_rejects_unknown() {
        assert_eq!(Role::from_str("Agent").unwrap(), Role::Agent);
        assert!(Role::from_str("owner").is_err());
        assert!(!Role::Client.sees_all_tickets());
    }
}
