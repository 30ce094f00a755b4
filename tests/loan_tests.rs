// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use bankdesk::BankError;
use bankdesk::ledger::{accounts, load_account, loans};
use bankdesk::models::{
    LoanApplicationStatus, LoanFinalStatus, LoanStatus, LoanType, TransactionType,
};
use common::{SAVINGS, dec, setup, today};

#[test]
fn application_starts_under_review() {
    let bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "New roof", today()).unwrap();
    assert_eq!(loan.application_status, LoanApplicationStatus::UnderReview);
    assert_eq!(loan.loan_status, LoanStatus::Pending);
    assert_eq!(loan.final_status, None);
    assert_eq!(loan.remarks.as_deref(), Some("Application received"));
    assert_eq!(loan.application_date, today());
    assert_eq!(loan.employee_id, None);
}

#[test]
fn application_is_validated() {
    let bank = setup();
    let pending = bank.pending_account(SAVINGS, "0");
    let err = loans::apply(&bank.conn, pending, bank.option_id, "Roof", today()).unwrap_err();
    assert!(matches!(err, BankError::AccountNotActive { .. }));

    let id = bank.active_account(SAVINGS, "0");
    let err = loans::apply(&bank.conn, id, 77, "Roof", today()).unwrap_err();
    assert!(matches!(err, BankError::LoanOptionNotFound(77)));
    let err = loans::apply(&bank.conn, id, bank.option_id, "   ", today()).unwrap_err();
    assert!(matches!(err, BankError::Validation { field: "purpose", .. }));
    let long = "p".repeat(251);
    let err = loans::apply(&bank.conn, id, bank.option_id, &long, today()).unwrap_err();
    assert!(matches!(err, BankError::Validation { field: "purpose", .. }));
}

#[test]
fn disbursement_requires_approved_application() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    let err = loans::disburse(&mut bank.conn, loan.id, true, today()).unwrap_err();
    assert!(matches!(
        err,
        BankError::LoanNotApproved {
            status: LoanApplicationStatus::UnderReview,
            ..
        }
    ));
    assert_eq!(bank.balance(id), dec("0"));
}

#[test]
fn approved_loan_is_disbursed_once() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "100");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();

    let reviewed =
        loans::review(&bank.conn, loan.id, true, bank.employee_id, None, today()).unwrap();
    assert_eq!(reviewed.application_status, LoanApplicationStatus::Approved);
    assert_eq!(reviewed.approved_date, Some(today()));
    assert_eq!(reviewed.employee_id, Some(bank.employee_id));
    assert_eq!(reviewed.remarks.as_deref(), Some("Application received"));

    let out = loans::disburse(&mut bank.conn, loan.id, true, today()).unwrap();
    let entry = out.entry.unwrap();
    assert_eq!(entry.kind, TransactionType::Loan);
    assert_eq!(entry.description, "Loan disbursed");
    assert_eq!(entry.credit, Some(dec("50000")));
    assert_eq!(out.loan.loan_status, LoanStatus::Disbursed);
    assert_eq!(out.loan.final_status, Some(LoanFinalStatus::Active));
    assert_eq!(out.loan.disbursement_date, Some(today()));
    assert_eq!(bank.balance(id), dec("50100"));
    assert_eq!(load_account(&bank.conn, id).unwrap().cibil_score, 300);

    let err = loans::disburse(&mut bank.conn, loan.id, true, today()).unwrap_err();
    assert!(matches!(err, BankError::LoanNotPending { .. }));
    assert_eq!(bank.balance(id), dec("50100"));
}

#[test]
fn disbursement_into_inactive_account_is_refused() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    loans::review(&bank.conn, loan.id, true, bank.employee_id, None, today()).unwrap();
    bank.conn
        .execute("UPDATE accounts SET status='OnHold' WHERE id=?1", [id])
        .unwrap();
    let err = loans::disburse(&mut bank.conn, loan.id, true, today()).unwrap_err();
    assert!(matches!(err, BankError::AccountNotActive { .. }));
    assert_eq!(
        loans::get(&bank.conn, loan.id).unwrap().loan_status,
        LoanStatus::Pending
    );
}

#[test]
fn rejected_review_closes_the_loan() {
    let bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    let rejected = loans::review(
        &bank.conn,
        loan.id,
        false,
        bank.employee_id,
        Some("Insufficient income"),
        today(),
    )
    .unwrap();
    assert_eq!(rejected.application_status, LoanApplicationStatus::Rejected);
    assert_eq!(rejected.loan_status, LoanStatus::Rejected);
    assert_eq!(rejected.final_status, Some(LoanFinalStatus::Closed));
    assert_eq!(rejected.remarks.as_deref(), Some("Insufficient income"));

    let err =
        loans::review(&bank.conn, loan.id, true, bank.employee_id, None, today()).unwrap_err();
    assert!(matches!(err, BankError::LoanNotUnderReview { .. }));
}

#[test]
fn review_needs_a_known_employee() {
    let bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    let err = loans::review(&bank.conn, loan.id, true, 404, None, today()).unwrap_err();
    assert!(matches!(err, BankError::EmployeeNotFound(404)));
}

#[test]
fn rejection_at_disbursement_moves_no_money() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    loans::review(&bank.conn, loan.id, true, bank.employee_id, None, today()).unwrap();
    let out = loans::disburse(&mut bank.conn, loan.id, false, today()).unwrap();
    assert!(out.entry.is_none());
    assert_eq!(out.loan.application_status, LoanApplicationStatus::Rejected);
    assert_eq!(out.loan.loan_status, LoanStatus::Rejected);
    assert_eq!(out.loan.final_status, Some(LoanFinalStatus::Closed));
    assert_eq!(bank.transaction_count(id), 0);
}

#[test]
fn closing_keeps_the_other_status_axes() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let loan = loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    loans::review(&bank.conn, loan.id, true, bank.employee_id, None, today()).unwrap();
    loans::disburse(&mut bank.conn, loan.id, true, today()).unwrap();

    let later = today().succ_opt().unwrap();
    let closed = loans::close(&bank.conn, loan.id, later).unwrap();
    assert_eq!(closed.final_status, Some(LoanFinalStatus::Closed));
    assert_eq!(closed.closed_date, Some(later));
    assert_eq!(closed.application_status, LoanApplicationStatus::Approved);
    assert_eq!(closed.loan_status, LoanStatus::Disbursed);

    let err = loans::close(&bank.conn, loan.id, later).unwrap_err();
    assert!(matches!(err, BankError::LoanAlreadyClosed(_)));
    let err = loans::close(&bank.conn, 999, later).unwrap_err();
    assert!(matches!(err, BankError::LoanNotFound(999)));
}

#[test]
fn history_joins_loan_option_and_needs_active_account() {
    let bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    loans::apply(&bank.conn, id, bank.option_id, "Roof", today()).unwrap();
    let history = loans::history(&bank.conn, id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].loan_type, LoanType::Home);
    assert_eq!(history[0].loan_amount, dec("50000"));
    assert_eq!(history[0].interest_rate, dec("8.5"));
    assert_eq!(history[0].tenure_months, 12);

    let other = bank.active_account(SAVINGS, "0");
    loans::apply(&bank.conn, other, bank.option_id, "Car", today()).unwrap();
    assert_eq!(loans::all(&bank.conn).unwrap().len(), 2);
    assert_eq!(
        loans::for_customer(&bank.conn, bank.customer_id)
            .unwrap()
            .len(),
        2
    );

    let details = accounts::details(&bank.conn, id).unwrap();
    assert_eq!(details.loans.len(), 1);
}
