//! SMTP adapter (outbound mail).
//!
//! Implements the `Mailer` port over lettre's async SMTP transport with
//! STARTTLS, matching the original Gmail deployment (port 587).

use async_trait::async_trait;
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use finbot_core::{errors::Error, mail::Mailer, Result};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, user: &str, password: &str) -> Result<Self> {
        let from: Mailbox = user
            .parse()
            .map_err(|e| Error::Mail(format!("invalid sender address {user}: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| Error::Mail(format!("smtp relay setup failed for {host}: {e}")))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| Error::Mail(format!("invalid recipient address {to}: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| Error::Mail(format!("message build failed: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::Mail(format!("smtp send failed: {e}")))?;

        tracing::info!("email sent to {to}");
        Ok(())
    }
}
