use crate::domain::Credential;

/// Ordered pool of generation-service credentials plus the cursor of the
/// currently active one.
///
/// The cursor is process-wide state shared by every caller of the generator:
/// rotation performed while serving one chat is visible to all later calls.
/// That is fine because any configured credential is equally valid for any
/// request. `advance()` is the only mutator and always wraps modulo pool
/// size; an empty pool never errors, it just has no current credential.
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
    cursor: usize,
}

impl CredentialPool {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// The active credential, or `None` while the pool is empty.
    pub fn current(&self) -> Option<&Credential> {
        self.credentials.get(self.cursor)
    }

    /// Move the cursor to the next credential, wrapping around. No-op on an
    /// empty pool.
    pub fn advance(&mut self) {
        if self.credentials.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.credentials.len();
        if let Some(c) = self.current() {
            tracing::info!("switched to generation credential ..{}", c.tail());
        }
    }
}
