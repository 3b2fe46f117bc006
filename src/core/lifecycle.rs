//! Invoice lifecycle state machine.
//!
//! ```text
//! DRAFT --submit--> SUBMITTED --approve--> APPROVED --mark_paid--> PAID
//!                       |
//!                       +------reject----> REJECTED
//! ```
//!
//! This module only decides whether a move is legal. `core::invoice` applies
//! the move and its time-entry side effects inside one database transaction.

use crate::{
    entities::{EntryStatus, InvoiceStatus},
    errors::{Error, Result},
};

/// A requested change of invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Owner sends a draft invoice for review
    Submit,
    /// Admin accepts a submitted invoice
    Approve,
    /// Admin sends a submitted invoice back
    Reject,
    /// Admin records payment of an approved invoice
    MarkPaid,
}

impl Transition {
    /// Verb used in error messages
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::MarkPaid => "mark paid",
        }
    }

    /// Status the invoice must be in for this transition.
    #[must_use]
    pub const fn required_status(self) -> InvoiceStatus {
        match self {
            Self::Submit => InvoiceStatus::Draft,
            Self::Approve | Self::Reject => InvoiceStatus::Submitted,
            Self::MarkPaid => InvoiceStatus::Approved,
        }
    }

    /// Status the invoice ends in.
    #[must_use]
    pub const fn target_status(self) -> InvoiceStatus {
        match self {
            Self::Submit => InvoiceStatus::Submitted,
            Self::Approve => InvoiceStatus::Approved,
            Self::Reject => InvoiceStatus::Rejected,
            Self::MarkPaid => InvoiceStatus::Paid,
        }
    }

    /// How the invoice's time entries move, if at all: `(from, to)`.
    #[must_use]
    pub const fn entry_effect(self) -> Option<(EntryStatus, EntryStatus)> {
        match self {
            Self::Submit => Some((EntryStatus::Submitted, EntryStatus::Locked)),
            Self::Reject => Some((EntryStatus::Locked, EntryStatus::Draft)),
            Self::Approve | Self::MarkPaid => None,
        }
    }

    /// Whether only admins may perform this transition.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        !matches!(self, Self::Submit)
    }
}

/// Returns the status `current` moves to under `transition`.
///
/// # Errors
/// Returns `InvalidTransition` when `current` is not the transition's source state.
pub fn next_status(current: InvoiceStatus, transition: Transition) -> Result<InvoiceStatus> {
    if current == transition.required_status() {
        Ok(transition.target_status())
    } else {
        Err(Error::InvalidTransition {
            from: current,
            action: transition.action(),
        })
    }
}
