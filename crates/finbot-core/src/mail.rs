use async_trait::async_trait;

use crate::{errors::Error, Result};

pub const LOAN_EMAIL_SUBJECT: &str = "Loan Application Status";

/// Port for outbound mail. The SMTP implementation lives in `finbot-mail`.
///
/// Delivery failure is logged by the caller and reflected in the chat reply;
/// it is never escalated past the workflow.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Stand-in used when mail credentials are not configured: every send fails
/// synchronously, so the workflow reports the email as undelivered instead of
/// silently claiming success.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<()> {
        Err(Error::Mail(format!(
            "mail credentials not configured, cannot send to {to}"
        )))
    }
}

/// Email body wrapping the decision text (parity with the chat reply).
pub fn loan_email_body(decision_text: &str) -> String {
    format!(
        "Dear Applicant,\n\nYour loan application has been processed.\n\n{decision_text}\n\nBest Regards,\nLoan Processing Team"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_body_carries_decision_text() {
        let body = loan_email_body("Loan approved with offer X");
        assert!(body.starts_with("Dear Applicant,"));
        assert!(body.contains("Loan approved with offer X"));
        assert!(body.ends_with("Loan Processing Team"));
    }

    #[tokio::test]
    async fn disabled_mailer_always_fails() {
        let m = DisabledMailer;
        assert!(m.send("a@b.com", "s", "b").await.is_err());
    }
}
