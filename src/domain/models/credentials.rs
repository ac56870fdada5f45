//! Credentials handed to adapters for one run.

use std::fmt;

/// Console login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsoleCredentials {
    /// Login email
    pub principal: String,
    /// Password, never logged
    pub secret: String,
}

impl fmt::Debug for ConsoleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleCredentials")
            .field("principal", &self.principal)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let creds = ConsoleCredentials {
            principal: "ops@example.com".to_string(),
            secret: "hunter2".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("ops@example.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
