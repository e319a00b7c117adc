//! Confirmation gate for mutating operations.
//!
//! Create/update/delete-style operations ask the gate before any request is
//! built; a declined gate is a clean no-op, not a failure. The force flag
//! on the invocation options bypasses the gate entirely.

/// User-facing confirmation prompt for mutating operations.
pub trait ConfirmGate: Send + Sync {
    /// Whether `action` should proceed against `target`.
    fn should_process(&self, action: &str, target: &str) -> bool;
}

/// Gate that approves everything; used by non-interactive callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl ConfirmGate for AutoConfirm {
    fn should_process(&self, _action: &str, _target: &str) -> bool {
        true
    }
}

/// Gate that declines everything; used in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl ConfirmGate for DenyAll {
    fn should_process(&self, _action: &str, _target: &str) -> bool {
        false
    }
}
