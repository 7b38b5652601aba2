use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Clinic portal roles. Every account holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dentist,
    Assistant,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Dentist => "dentist",
            Role::Assistant => "assistant",
            Role::Patient => "patient",
        }
    }

    /// Dashboard path a freshly signed-in account of this role lands on.
    /// Exhaustive by construction: a new role will not compile without a
    /// landing route.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Dentist => "/dentist/dashboard",
            Role::Assistant => "/assistant/dashboard",
            Role::Patient => "/patient/home",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dentist" => Ok(Role::Dentist),
            "assistant" => Ok(Role::Assistant),
            "patient" => Ok(Role::Patient),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Account in the clinic system
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Account creation request
#[derive(Debug)]
pub struct CreateAccount {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Dentist, Role::Assistant, Role::Patient] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!("Dentist".parse::<Role>().unwrap(), Role::Dentist);
        assert!("receptionist".parse::<Role>().is_err());
    }

    #[test]
    fn test_landing_paths_are_role_scoped() {
        assert_eq!(Role::Dentist.landing_path(), "/dentist/dashboard");
        assert_eq!(Role::Assistant.landing_path(), "/assistant/dashboard");
        assert_eq!(Role::Patient.landing_path(), "/patient/home");
    }
}
