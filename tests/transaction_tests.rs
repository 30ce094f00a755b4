// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use bankdesk::BankError;
use bankdesk::ledger::accounts::{self, NewBeneficiary};
use bankdesk::ledger::lifecycle;
use bankdesk::ledger::limits::DailyLimits;
use bankdesk::models::TransactionType;
use common::{BUSINESS, PIN, SALARY, SAVINGS, dec, setup, today};

fn beneficiary(bank: &common::Bank, account_id: i64) -> i64 {
    accounts::add_beneficiary(
        &bank.conn,
        account_id,
        &NewBeneficiary {
            account_name: "Ron Weasley".into(),
            account_number: "55501234".into(),
            branch_id: bank.branch_id,
        },
    )
    .unwrap()
    .id
}

#[test]
fn deposit_credits_balance_and_books_entry() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "100");
    let entry = accounts::deposit(&mut bank.conn, id, dec("250.50"), PIN, today()).unwrap();
    assert_eq!(entry.kind, TransactionType::Deposit);
    assert_eq!(entry.description, "Deposit to Account");
    assert_eq!(entry.credit, Some(dec("250.50")));
    assert_eq!(entry.debit, None);
    assert_eq!(entry.updated_balance, dec("350.50"));
    assert_eq!(bank.balance(id), dec("350.50"));
}

#[test]
fn withdrawal_debits_balance() {
    let mut bank = setup();
    let limits = DailyLimits::default();
    let id = bank.active_account(SAVINGS, "1000");
    let entry =
        accounts::withdraw(&mut bank.conn, &limits, id, dec("400"), PIN, today()).unwrap();
    assert_eq!(entry.description, "Self Withdrawal");
    assert_eq!(entry.debit, Some(dec("400")));
    assert_eq!(bank.balance(id), dec("600"));
}

#[test]
fn overdraw_is_rejected_without_mutation() {
    let mut bank = setup();
    let limits = DailyLimits::default();
    let id = bank.active_account(SAVINGS, "500");
    let err =
        accounts::withdraw(&mut bank.conn, &limits, id, dec("600"), PIN, today()).unwrap_err();
    assert!(matches!(err, BankError::InsufficientBalance { .. }));
    assert_eq!(bank.balance(id), dec("500"));
    assert_eq!(bank.transaction_count(id), 0);
}

#[test]
fn exact_balance_can_be_withdrawn() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "500");
    accounts::withdraw(&mut bank.conn, &DailyLimits::default(), id, dec("500"), PIN, today())
        .unwrap();
    assert_eq!(bank.balance(id), dec("0"));
}

#[test]
fn savings_daily_limit_counts_all_debits_of_the_day() {
    let mut bank = setup();
    let limits = DailyLimits::default();
    let id = bank.active_account(SAVINGS, "250000");
    let ben = beneficiary(&bank, id);

    accounts::withdraw(&mut bank.conn, &limits, id, dec("60000"), PIN, today()).unwrap();
    accounts::transfer(&mut bank.conn, &limits, id, ben, dec("30000"), PIN, today()).unwrap();
    let err = accounts::withdraw(&mut bank.conn, &limits, id, dec("10001"), PIN, today())
        .unwrap_err();
    match err {
        BankError::DailyLimitExceeded {
            limit,
            used,
            requested,
        } => {
            assert_eq!(limit, dec("100000"));
            assert_eq!(used, dec("90000"));
            assert_eq!(requested, dec("10001"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(bank.balance(id), dec("160000"));

    accounts::withdraw(&mut bank.conn, &limits, id, dec("10000"), PIN, today()).unwrap();
    let tomorrow = today().succ_opt().unwrap();
    accounts::withdraw(&mut bank.conn, &limits, id, dec("50000"), PIN, tomorrow).unwrap();
}

#[test]
fn limit_follows_account_type() {
    let mut bank = setup();
    let limits = DailyLimits::default();
    let salary = bank.active_account(SALARY, "500000");
    let business = bank.active_account(BUSINESS, "500000");

    accounts::withdraw(&mut bank.conn, &limits, salary, dec("300000"), PIN, today()).unwrap();
    let err = accounts::withdraw(&mut bank.conn, &limits, salary, dec("1"), PIN, today())
        .unwrap_err();
    assert!(matches!(err, BankError::DailyLimitExceeded { .. }));

    accounts::withdraw(&mut bank.conn, &limits, business, dec("450000"), PIN, today()).unwrap();
}

#[test]
fn configured_limits_override_defaults() {
    let mut bank = setup();
    let limits = DailyLimits {
        savings: dec("1000"),
        ..DailyLimits::default()
    };
    let id = bank.active_account(SAVINGS, "5000");
    let err = accounts::withdraw(&mut bank.conn, &limits, id, dec("1000.01"), PIN, today())
        .unwrap_err();
    assert!(matches!(err, BankError::DailyLimitExceeded { .. }));
}

#[test]
fn deposits_have_no_daily_limit() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    accounts::deposit(&mut bank.conn, id, dec("5000000"), PIN, today()).unwrap();
    assert_eq!(bank.balance(id), dec("5000000"));
}

#[test]
fn deposit_past_the_largest_balance_is_refused() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let max = dec("79228162514264337593543950335");
    accounts::deposit(&mut bank.conn, id, max, PIN, today()).unwrap();

    let err = accounts::deposit(&mut bank.conn, id, dec("1"), PIN, today()).unwrap_err();
    assert!(matches!(err, BankError::BalanceOverflow { account_id, .. } if account_id == id));
    assert!(err.is_client_error());
    assert_eq!(bank.balance(id), max);
    assert_eq!(bank.transaction_count(id), 1);
}

#[test]
fn limit_check_survives_huge_daily_totals() {
    let err = DailyLimits::check(
        dec("50000"),
        dec("79228162514264337593543950335"),
        dec("1"),
    )
    .unwrap_err();
    assert!(matches!(err, BankError::DailyLimitExceeded { .. }));
}

#[test]
fn non_positive_amounts_are_rejected() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "100");
    let err = accounts::deposit(&mut bank.conn, id, dec("0"), PIN, today()).unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));
    let err = accounts::withdraw(
        &mut bank.conn,
        &DailyLimits::default(),
        id,
        dec("-5"),
        PIN,
        today(),
    )
    .unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));
    assert_eq!(bank.balance(id), dec("100"));
}

#[test]
fn wrong_or_malformed_pin_is_rejected() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "100");
    for pin in ["1234", "12a4", "43210", ""] {
        let err = accounts::deposit(&mut bank.conn, id, dec("10"), pin, today()).unwrap_err();
        assert!(matches!(err, BankError::InvalidPin(_)), "pin {pin:?}");
    }
    assert_eq!(bank.transaction_count(id), 0);
}

#[test]
fn unknown_account_is_not_found() {
    let mut bank = setup();
    let err = accounts::deposit(&mut bank.conn, 999, dec("10"), PIN, today()).unwrap_err();
    assert!(matches!(err, BankError::AccountNotFound(999)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn pending_account_cannot_move_money() {
    let mut bank = setup();
    let id = bank.pending_account(SAVINGS, "100");
    let err = accounts::deposit(&mut bank.conn, id, dec("10"), PIN, today()).unwrap_err();
    assert!(matches!(err, BankError::AccountNotActive { .. }));
}

#[test]
fn closed_account_rejects_every_transaction_type() {
    let mut bank = setup();
    let limits = DailyLimits::default();
    let id = bank.active_account(SAVINGS, "1000");
    let ben = beneficiary(&bank, id);
    lifecycle::request_deactivation(&bank.conn, id).unwrap();
    lifecycle::decide_deactivation(&bank.conn, id, true).unwrap();

    let deposit = accounts::deposit(&mut bank.conn, id, dec("10"), PIN, today()).unwrap_err();
    let withdraw =
        accounts::withdraw(&mut bank.conn, &limits, id, dec("10"), PIN, today()).unwrap_err();
    let transfer =
        accounts::transfer(&mut bank.conn, &limits, id, ben, dec("10"), PIN, today()).unwrap_err();
    // closed wins over a bad PIN
    let bad_pin = accounts::deposit(&mut bank.conn, id, dec("10"), "9999", today()).unwrap_err();
    for err in [deposit, withdraw, transfer, bad_pin] {
        assert!(matches!(err, BankError::AccountClosed(_)), "{err:?}");
    }
    assert_eq!(bank.balance(id), dec("1000"));
}

#[test]
fn transfer_books_only_the_debit_side() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "1000");
    let ben = beneficiary(&bank, id);
    let entry = accounts::transfer(
        &mut bank.conn,
        &DailyLimits::default(),
        id,
        ben,
        dec("300"),
        PIN,
        today(),
    )
    .unwrap();
    assert_eq!(entry.kind, TransactionType::Transfer);
    assert_eq!(entry.description, "Transfer to Beneficiary Account: 55501234");
    assert_eq!(entry.debit, Some(dec("300")));
    assert_eq!(bank.balance(id), dec("700"));
    let total: i64 = bank
        .conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn transfer_needs_a_beneficiary_of_the_same_account() {
    let mut bank = setup();
    let limits = DailyLimits::default();
    let a = bank.active_account(SAVINGS, "1000");
    let b = bank.active_account(SAVINGS, "1000");
    let foreign = beneficiary(&bank, b);
    let err =
        accounts::transfer(&mut bank.conn, &limits, a, foreign, dec("10"), PIN, today())
            .unwrap_err();
    assert!(matches!(
        err,
        BankError::BeneficiaryNotFound { account_id, .. } if account_id == a
    ));
    assert_eq!(bank.balance(a), dec("1000"));
}

#[test]
fn change_pin_requires_old_pin_and_valid_new_pin() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "100");
    let err = accounts::change_pin(&bank.conn, id, "1111", "2222").unwrap_err();
    assert!(matches!(err, BankError::InvalidPin(_)));
    let err = accounts::change_pin(&bank.conn, id, PIN, "0999").unwrap_err();
    assert!(matches!(err, BankError::Validation { field: "pin", .. }));

    accounts::change_pin(&bank.conn, id, PIN, "2222").unwrap();
    accounts::deposit(&mut bank.conn, id, dec("1"), "2222", today()).unwrap();
    let err = accounts::deposit(&mut bank.conn, id, dec("1"), PIN, today()).unwrap_err();
    assert!(matches!(err, BankError::InvalidPin(_)));
}

#[test]
fn beneficiary_fields_are_validated() {
    let bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let err = accounts::add_beneficiary(
        &bank.conn,
        id,
        &NewBeneficiary {
            account_name: "x".repeat(51),
            account_number: "1".into(),
            branch_id: bank.branch_id,
        },
    )
    .unwrap_err();
    assert!(matches!(err, BankError::Validation { field: "account_name", .. }));
    let err = accounts::add_beneficiary(
        &bank.conn,
        id,
        &NewBeneficiary {
            account_name: "Ron".into(),
            account_number: "1".into(),
            branch_id: 42,
        },
    )
    .unwrap_err();
    assert!(matches!(err, BankError::BranchNotFound(42)));
    assert!(accounts::beneficiaries(&bank.conn, id).unwrap().is_empty());
}

#[test]
fn statement_filters_by_date_and_requires_active() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    let day1 = today();
    let day2 = day1.succ_opt().unwrap();
    accounts::deposit(&mut bank.conn, id, dec("10"), PIN, day1).unwrap();
    accounts::deposit(&mut bank.conn, id, dec("20"), PIN, day2).unwrap();

    let all = accounts::statement(&bank.conn, id, None, None).unwrap();
    assert_eq!(all.len(), 2);
    let second = accounts::statement(&bank.conn, id, Some(day2), None).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].updated_balance, dec("30"));

    lifecycle::request_deactivation(&bank.conn, id).unwrap();
    let err = accounts::statement(&bank.conn, id, None, None).unwrap_err();
    assert!(matches!(err, BankError::AccountNotActive { .. }));
    assert_eq!(
        accounts::transactions_for_account(&bank.conn, id, None, None)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn details_bundle_customer_ledger_and_loans() {
    let mut bank = setup();
    let id = bank.active_account(SAVINGS, "0");
    accounts::deposit(&mut bank.conn, id, dec("10"), PIN, today()).unwrap();
    let details = accounts::details(&bank.conn, id).unwrap();
    assert_eq!(details.customer.id, bank.customer_id);
    assert_eq!(details.transactions.len(), 1);
    assert!(details.loans.is_empty());
    let json = serde_json::to_value(&details).unwrap();
    assert!(json["account"].get("pin").is_none());
}
