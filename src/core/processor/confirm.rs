//! Operator confirmation before deleting duplicates.

use std::io;

/// Asks whether a batch of deletions may go ahead
///
/// An `Err` means no answer could be read; callers treat it as a refusal.
pub trait Confirmer {
    fn confirm_deletion(&self, pending: usize) -> io::Result<bool>;
}

/// Answers every prompt the same way without asking anyone
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    answer: bool,
}

impl AutoConfirm {
    pub fn approve() -> Self {
        Self { answer: true }
    }

    pub fn decline() -> Self {
        Self { answer: false }
    }
}

impl Confirmer for AutoConfirm {
    fn confirm_deletion(&self, _pending: usize) -> io::Result<bool> {
        Ok(self.answer)
    }
}

/// `y` or `yes`, any case, surrounding whitespace ignored
pub fn is_affirmative(response: &str) -> bool {
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
