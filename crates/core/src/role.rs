//! The role stored alongside the session token.

use std::fmt;

/// Who is looking at the page. Decides which card actions are offered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Doctor,
    /// Nobody signed in, or a visitor who picked "patient" but has not logged in.
    #[default]
    AnonymousOrPatient,
    AuthenticatedPatient,
}

impl Role {
    /// Parses the stored `userRole` value.
    ///
    /// Unknown and missing values are treated as an anonymous visitor.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("admin") => Role::Admin,
            Some("doctor") => Role::Doctor,
            Some("loggedPatient") => Role::AuthenticatedPatient,
            _ => Role::AnonymousOrPatient,
        }
    }

    /// Value written to the session store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::AnonymousOrPatient => "patient",
            Role::AuthenticatedPatient => "loggedPatient",
        }
    }

    /// Path segment the backend expects for token-scoped patient and availability lookups.
    pub fn api_user(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            _ => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_stored_value() {
        assert_eq!(Role::from_stored(Some("admin")), Role::Admin);
        assert_eq!(Role::from_stored(Some("doctor")), Role::Doctor);
        assert_eq!(Role::from_stored(Some("loggedPatient")), Role::AuthenticatedPatient);
        assert_eq!(Role::from_stored(Some("patient")), Role::AnonymousOrPatient);
        assert_eq!(Role::from_stored(None), Role::AnonymousOrPatient);
        assert_eq!(Role::from_stored(Some("superuser")), Role::AnonymousOrPatient);
    }

    #[test]
    fn stored_value_round_trips() {
        for role in [
            Role::Admin,
            Role::Doctor,
            Role::AnonymousOrPatient,
            Role::AuthenticatedPatient,
        ] {
            assert_eq!(Role::from_stored(Some(role.as_str())), role);
        }
    }
}
