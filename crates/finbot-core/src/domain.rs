use std::fmt;

/// One generation-service API key, i.e. one quota allocation.
///
/// Loaded once at startup and never mutated. `Debug` and logs only ever see
/// the tail so the secret stays out of output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// Last 6 characters, for log lines identifying which key is active.
    pub fn tail(&self) -> &str {
        let n = self.0.len();
        &self.0[n.saturating_sub(6)..]
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(..{})", self.tail())
    }
}

/// Binary classifier verdict for a loan application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Deny,
}

/// Parsed `/loan` payload. Built per command, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct LoanApplication {
    pub name: String,
    pub email: String,
    pub income: f64,
    pub loan_amount: f64,
    pub credit_score: f64,
}

/// Terminal state of the loan workflow.
#[derive(Clone, Debug, PartialEq)]
pub enum LoanOutcome {
    /// Malformed payload; no classifier, generation, or mail call happened.
    InvalidFormat,
    Decided {
        approved: bool,
        /// Full user-facing reply, including delivery confirmation or not.
        reply: String,
        email: String,
        email_sent: bool,
    },
}

/// One search-provider news result.
#[derive(Clone, Debug, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_hides_secret() {
        let c = Credential::new("AIzaSyA-very-secret-key-123456");
        let dbg = format!("{c:?}");
        assert_eq!(dbg, "Credential(..123456)");
        assert!(!dbg.contains("very-secret"));
    }

    #[test]
    fn credential_tail_handles_short_secrets() {
        assert_eq!(Credential::new("abc").tail(), "abc");
        assert_eq!(Credential::new("").tail(), "");
    }
}
