// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Customer notices. Delivery is pluggable through [`Notifier`]; the default
//! writes each notice to the log.

use std::cell::RefCell;

use anyhow::Result;
use serde::Serialize;

use crate::models::{Account, Customer, Loan, Transaction};
use crate::utils::fmt_money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

pub trait Notifier {
    fn send(&self, notice: &Notice) -> Result<()>;
}

pub struct TracingNotifier {
    sender: String,
}

impl TracingNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Notifier for TracingNotifier {
    fn send(&self, notice: &Notice) -> Result<()> {
        tracing::info!(
            from = %self.sender,
            to = %notice.recipient_email,
            subject = %notice.subject,
            "notice sent"
        );
        tracing::debug!(body = %notice.body, "notice body");
        Ok(())
    }
}

/// Keeps every notice in memory; handy for tests and dry runs.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notice> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notice: &Notice) -> Result<()> {
        self.sent.borrow_mut().push(notice.clone());
        Ok(())
    }
}

/// Sends `notice`, logging instead of failing: the banking operation that
/// triggered it has already committed.
pub fn notify_quietly(notifier: &dyn Notifier, notice: Notice) {
    if let Err(e) = notifier.send(&notice) {
        tracing::warn!(
            to = %notice.recipient_email,
            subject = %notice.subject,
            error = %e,
            "notice could not be sent"
        );
    }
}

fn notice(customer: &Customer, subject: impl Into<String>, body: String) -> Notice {
    Notice {
        recipient_name: customer.full_name(),
        recipient_email: customer.email.clone(),
        subject: subject.into(),
        body: format!("Dear {},\n\n{}", customer.full_name(), body),
    }
}

fn masked(account_number: &str) -> String {
    let tail: String = account_number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("XXXXXX{}", tail)
}

pub fn transaction_notice(customer: &Customer, account: &Account, entry: &Transaction) -> Notice {
    let (verb, amount) = match (entry.credit, entry.debit) {
        (Some(c), _) => ("credited to", c),
        (None, Some(d)) => ("debited from", d),
        (None, None) => ("recorded on", Default::default()),
    };
    notice(
        customer,
        format!("{} on account {}", entry.kind, masked(&account.account_number)),
        format!(
            "{} {} account {} on {}: {}.\nAvailable balance: {}.",
            fmt_money(&amount),
            verb,
            masked(&account.account_number),
            entry.date,
            entry.description,
            fmt_money(&entry.updated_balance)
        ),
    )
}

pub fn pin_changed_notice(customer: &Customer, account: &Account) -> Notice {
    notice(
        customer,
        "PIN changed",
        format!(
            "The PIN for account {} was changed. If this was not you, contact your branch.",
            masked(&account.account_number)
        ),
    )
}

pub fn account_request_notice(customer: &Customer, account: &Account, approved: bool) -> Notice {
    let outcome = if approved { "approved" } else { "rejected" };
    notice(
        customer,
        format!("Account request {}", outcome),
        format!(
            "Your request for account {} has been {}. Current status: {}.",
            account.account_number, outcome, account.status
        ),
    )
}

pub fn deactivation_notice(customer: &Customer, account: &Account, approved: bool) -> Notice {
    let body = if approved {
        format!("Account {} has been closed.", masked(&account.account_number))
    } else {
        format!(
            "Your request to close account {} was declined; the account stays {}.",
            masked(&account.account_number),
            account.status
        )
    };
    notice(customer, "Account deactivation", body)
}

pub fn disbursement_notice(customer: &Customer, loan: &Loan, entry: Option<&Transaction>) -> Notice {
    let body = match entry {
        Some(e) => format!(
            "Loan {} has been disbursed. {} was credited on {}; available balance {}.",
            loan.id,
            fmt_money(&e.credit.unwrap_or_default()),
            e.date,
            fmt_money(&e.updated_balance)
        ),
        None => format!("Loan {} was rejected at disbursement.", loan.id),
    };
    notice(customer, format!("Loan {} {}", loan.id, loan.loan_status), body)
}

pub fn loan_closed_notice(customer: &Customer, loan: &Loan) -> Notice {
    notice(
        customer,
        format!("Loan {} closed", loan.id),
        format!(
            "Loan {} was closed on {}.",
            loan.id,
            crate::utils::fmt_opt(&loan.closed_date)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four_digits() {
        assert_eq!(masked("1234567890"), "XXXXXX7890");
        assert_eq!(masked("12"), "XXXXXX12");
    }

    struct Failing;

    impl Notifier for Failing {
        fn send(&self, _notice: &Notice) -> Result<()> {
            anyhow::bail!("smtp down")
        }
    }

    #[test]
    fn quiet_notify_swallows_failures() {
        notify_quietly(
            &Failing,
            Notice {
                recipient_name: "A".into(),
                recipient_email: "a@example.com".into(),
                subject: "s".into(),
                body: "b".into(),
            },
        );
    }
}
