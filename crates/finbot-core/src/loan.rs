use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::{
    classifier::LoanClassifier,
    domain::{Decision, LoanApplication, LoanOutcome},
    errors::Error,
    generation::ResilientGenerator,
    mail::{loan_email_body, Mailer, LOAN_EMAIL_SUBJECT},
    Result,
};

pub const INVALID_FORMAT_REPLY: &str =
    "❌ Invalid format. Please send: /loan Name, Email, Income, LoanAmount, CreditScore";

const DEFAULT_CREDIT_SCORE: f64 = 700.0;

const APPROVAL_FALLBACK: &str =
    "✅ Loan Approved!\n\n🔹 But AI Bank's loan services are currently unavailable.";
const DENIAL_FALLBACK: &str =
    "Due to financial risk factors, the loan could not be approved.";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

/// Parse a comma-delimited loan payload:
/// `Name, Email, Income, LoanAmount[, CreditScore]`.
///
/// Credit score defaults to 700 when omitted. Anything malformed (too few
/// fields, non-numeric or negative amounts, non-email second field) is an
/// invalid-format error; the caller must not classify, generate, or mail.
pub fn parse_application(raw: &str) -> Result<LoanApplication> {
    let fields: Vec<&str> = raw.split(',').map(|f| f.trim()).collect();
    if fields.len() < 4 {
        return Err(Error::InvalidFormat);
    }

    let name = fields[0].to_string();
    let email = fields[1].to_string();
    if name.is_empty() || !email_regex().is_match(&email) {
        return Err(Error::InvalidFormat);
    }

    let income = parse_amount(fields[2])?;
    let loan_amount = parse_amount(fields[3])?;
    let credit_score = match fields.get(4) {
        Some(f) => f.parse::<f64>().map_err(|_| Error::InvalidFormat)?,
        None => DEFAULT_CREDIT_SCORE,
    };

    Ok(LoanApplication {
        name,
        email,
        income,
        loan_amount,
        credit_score,
    })
}

fn parse_amount(field: &str) -> Result<f64> {
    let v = field.parse::<f64>().map_err(|_| Error::InvalidFormat)?;
    if !v.is_finite() || v < 0.0 {
        return Err(Error::InvalidFormat);
    }
    Ok(v)
}

fn approval_prompt(raw: &str) -> String {
    format!(
        "You are a loan officer at AI Bank. A customer has been approved for a loan for small businesses.\n\
         Based on their profile, recommend 3 loan options they are eligible for.\n\
         Also, provide a detailed explanation about the loan benefits and why these loans are a good choice.\n\n\
         Customer Details:\n{raw}\n\n\
         Format your response as:\n\
         1️⃣ Loan Name: [Loan Name]\n   \
         - Loan Amount: ₹X Lakhs\n   \
         - Interest Rate: X.XX%\n   \
         - Benefits: [Short explanation]\n\n\
         2️⃣ Loan Name: ...\n\
         3️⃣ Loan Name: ...\n\n\
         Conclude with a professional closing message from AI Bank."
    )
}

fn denial_prompt(raw: &str) -> String {
    format!(
        "You are a professional bank loan officer.\n\
         The following loan application has been denied. Generate a realistic-sounding reason for rejection.\n\n\
         Loan Application:\n{raw}\n\n\
         Respond with a professional explanation that sounds like a real financial assessment."
    )
}

/// The loan decisioning workflow: parse, classify, generate the explanation
/// for whichever branch the classifier picked, then email the outcome.
pub struct LoanWorkflow {
    classifier: Arc<dyn LoanClassifier>,
    generator: Arc<ResilientGenerator>,
    mailer: Arc<dyn Mailer>,
}

impl LoanWorkflow {
    pub fn new(
        classifier: Arc<dyn LoanClassifier>,
        generator: Arc<ResilientGenerator>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            classifier,
            generator,
            mailer,
        }
    }

    pub async fn process(&self, raw: &str) -> LoanOutcome {
        let application = match parse_application(raw) {
            Ok(app) => app,
            Err(_) => return LoanOutcome::InvalidFormat,
        };

        let decision = self.classifier.predict(
            application.income,
            application.loan_amount,
            application.credit_score,
        );
        tracing::info!(
            "loan application for {} classified as {decision:?}",
            application.email
        );

        let (approved, decision_text) = match decision {
            Decision::Approve => {
                let offer = self
                    .generator
                    .generate_or_fallback(&approval_prompt(raw), APPROVAL_FALLBACK)
                    .await;
                (true, offer)
            }
            Decision::Deny => {
                let reason = self
                    .generator
                    .generate_or_fallback(&denial_prompt(raw), DENIAL_FALLBACK)
                    .await;
                (false, format!("❌ Loan Denied.\nReason: {reason}"))
            }
        };

        // The reply only claims delivery once the send actually succeeded.
        let email = application.email.clone();
        let send_result = self
            .mailer
            .send(&email, LOAN_EMAIL_SUBJECT, &loan_email_body(&decision_text))
            .await;

        let (email_sent, reply) = match send_result {
            Ok(()) => (
                true,
                format!(
                    "✅ Application received! A confirmation email has been sent to {email}.\n\n{decision_text}"
                ),
            ),
            Err(e) => {
                tracing::warn!("failed to send loan outcome email to {email}: {e}");
                (
                    false,
                    format!(
                        "⚠️ Application received, but the confirmation email to {email} could not be delivered.\n\n{decision_text}"
                    ),
                )
            }
        };

        LoanOutcome::Decided {
            approved,
            reply,
            email,
            email_sent,
        }
    }
}
