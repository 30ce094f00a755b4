// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregates over the ledger for the employee and admin views.
//!
//! Amounts are summed as `Decimal` in Rust; percentages are plain `f64`.

use std::collections::{BTreeMap, HashMap};

use chrono::{Months, NaiveDate};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::error::{BankError, BankResult};
use crate::ledger::lifecycle::list_accounts;
use crate::ledger::transaction_from_row;
use crate::models::{AccountStatus, LoanFinalStatus, LoanStatus, TransactionType};
use crate::records::{branches, customers};
use crate::utils::{add_amounts, count, decimal_at, sum_decimals};

const TOP_CUSTOMERS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct FinancialReport {
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub total_loans_disbursed: Decimal,
    pub net_balance: Decimal,
    pub interest_income: Decimal,
    pub active_accounts: i64,
    pub disbursed_loans: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchBalance {
    pub branch_id: i64,
    pub name: String,
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCustomer {
    pub customer_id: i64,
    pub name: String,
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeVolume {
    pub count: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub employees: i64,
    pub customers: i64,
    pub male_customers: i64,
    pub female_customers: i64,
    pub transactions: i64,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub total_loans_disbursed: Decimal,
    pub interest_income: Decimal,
    pub active_accounts: i64,
    pub average_active_balance: Decimal,
    pub loan_approval_rate: f64,
    pub top_branch: Option<BranchBalance>,
    pub top_customers: Vec<TopCustomer>,
    pub overdue_loans: i64,
    pub average_loan_amount: Decimal,
    pub volume_by_type: BTreeMap<TransactionType, TypeVolume>,
    pub new_customers_last_month: i64,
    pub loans_to_deposits_ratio: f64,
}

struct DisbursedLoan {
    amount: Decimal,
    interest_rate: Decimal,
    tenure_months: u32,
    disbursement_date: Option<NaiveDate>,
    closed: bool,
}

fn disbursed_loans(conn: &Connection) -> BankResult<Vec<DisbursedLoan>> {
    let mut stmt = conn.prepare(
        "SELECT o.amount, o.interest_rate, o.tenure_months, l.disbursement_date, l.final_status
         FROM loans l JOIN loan_options o ON o.id=l.loan_option_id
         WHERE l.loan_status=?1",
    )?;
    let rows = stmt.query_map(params![LoanStatus::Disbursed], |r| {
        Ok(DisbursedLoan {
            amount: decimal_at(r, 0)?,
            interest_rate: decimal_at(r, 1)?,
            tenure_months: r.get(2)?,
            disbursement_date: r.get(3)?,
            closed: r.get::<_, Option<LoanFinalStatus>>(4)? == Some(LoanFinalStatus::Closed),
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn interest_income(loans: &[DisbursedLoan]) -> BankResult<Decimal> {
    loans.iter().try_fold(Decimal::ZERO, |total, l| {
        let interest = l
            .amount
            .checked_mul(l.interest_rate)
            .map(|v| v / Decimal::ONE_HUNDRED)
            .ok_or_else(|| BankError::CorruptData(format!("interest on {}", l.amount)))?;
        add_amounts(total, interest)
    })
}

fn percent(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part / whole * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}

pub fn financial_report(conn: &Connection) -> BankResult<FinancialReport> {
    let loans = disbursed_loans(conn)?;
    Ok(FinancialReport {
        total_deposits: sum_decimals(
            conn,
            "SELECT credit FROM transactions WHERE kind=?1",
            params![TransactionType::Deposit],
        )?,
        total_withdrawals: sum_decimals(
            conn,
            "SELECT debit FROM transactions WHERE kind IN (?1, ?2)",
            params![TransactionType::Withdrawal, TransactionType::Transfer],
        )?,
        total_loans_disbursed: sum_decimals(
            conn,
            "SELECT credit FROM transactions WHERE kind=?1",
            params![TransactionType::Loan],
        )?,
        net_balance: sum_decimals(
            conn,
            "SELECT balance FROM accounts WHERE status=?1",
            params![AccountStatus::Active],
        )?,
        interest_income: interest_income(&loans)?,
        active_accounts: count(
            conn,
            "SELECT COUNT(*) FROM accounts WHERE status=?1",
            params![AccountStatus::Active],
        )?,
        disbursed_loans: loans.len() as i64,
    })
}

fn volume_by_type(conn: &Connection) -> BankResult<BTreeMap<TransactionType, TypeVolume>> {
    let sql = format!(
        "SELECT {} FROM transactions",
        crate::ledger::TRANSACTION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], transaction_from_row)?;
    let mut out: BTreeMap<TransactionType, TypeVolume> = BTreeMap::new();
    for row in rows {
        let t = row?;
        let slot = out.entry(t.kind).or_default();
        slot.count += 1;
        slot.amount = add_amounts(slot.amount, t.debit.or(t.credit).unwrap_or_default())?;
    }
    Ok(out)
}

/// Ranks open (non-Closed) accounts' balances by branch and by customer.
fn balance_leaders(conn: &Connection) -> BankResult<(Option<BranchBalance>, Vec<TopCustomer>)> {
    let accounts = list_accounts(conn, None)?;
    let mut by_branch: HashMap<i64, Decimal> = HashMap::new();
    let mut by_customer: HashMap<i64, Decimal> = HashMap::new();
    for a in accounts.iter().filter(|a| a.status != AccountStatus::Closed) {
        let branch = by_branch.entry(a.branch_id).or_default();
        *branch = add_amounts(*branch, a.balance)?;
        let customer = by_customer.entry(a.customer_id).or_default();
        *customer = add_amounts(*customer, a.balance)?;
    }

    let top_branch = match by_branch
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    {
        Some((branch_id, total_balance)) => Some(BranchBalance {
            branch_id,
            name: branches::get(conn, branch_id)?.name,
            total_balance,
        }),
        None => None,
    };

    let mut ranked: Vec<(i64, Decimal)> = by_customer.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut top_customers = Vec::new();
    for (customer_id, total_balance) in ranked.into_iter().take(TOP_CUSTOMERS) {
        top_customers.push(TopCustomer {
            customer_id,
            name: customers::get(conn, customer_id)?.full_name(),
            total_balance,
        });
    }
    Ok((top_branch, top_customers))
}

/// A disbursed loan still open past its tenure.
fn is_overdue(loan: &DisbursedLoan, today: NaiveDate) -> bool {
    if loan.closed {
        return false;
    }
    loan.disbursement_date
        .and_then(|d| d.checked_add_months(Months::new(loan.tenure_months)))
        .is_some_and(|due| due < today)
}

pub fn dashboard(conn: &Connection, today: NaiveDate) -> BankResult<AdminDashboard> {
    let report = financial_report(conn)?;
    let loans = disbursed_loans(conn)?;

    let all_loans = count(conn, "SELECT COUNT(*) FROM loans", [])?;
    let approved = count(
        conn,
        "SELECT COUNT(*) FROM loans WHERE application_status='Approved'",
        [],
    )?;
    let average_active_balance = if report.active_accounts > 0 {
        report.net_balance / Decimal::from(report.active_accounts)
    } else {
        Decimal::ZERO
    };
    let average_loan_amount = if loans.is_empty() {
        Decimal::ZERO
    } else {
        let total = loans
            .iter()
            .try_fold(Decimal::ZERO, |total, l| add_amounts(total, l.amount))?;
        total / Decimal::from(loans.len() as i64)
    };
    let month_ago = today.checked_sub_months(Months::new(1)).unwrap_or(today);
    let (top_branch, top_customers) = balance_leaders(conn)?;

    Ok(AdminDashboard {
        employees: count(conn, "SELECT COUNT(*) FROM employees", [])?,
        customers: count(conn, "SELECT COUNT(*) FROM customers", [])?,
        male_customers: count(
            conn,
            "SELECT COUNT(*) FROM customers WHERE gender='Male'",
            [],
        )?,
        female_customers: count(
            conn,
            "SELECT COUNT(*) FROM customers WHERE gender='Female'",
            [],
        )?,
        transactions: count(conn, "SELECT COUNT(*) FROM transactions", [])?,
        total_deposits: report.total_deposits,
        total_withdrawals: report.total_withdrawals,
        total_loans_disbursed: report.total_loans_disbursed,
        interest_income: report.interest_income,
        active_accounts: report.active_accounts,
        average_active_balance,
        loan_approval_rate: percent(Decimal::from(approved), Decimal::from(all_loans)),
        top_branch,
        top_customers,
        overdue_loans: loans.iter().filter(|l| is_overdue(l, today)).count() as i64,
        average_loan_amount,
        volume_by_type: volume_by_type(conn)?,
        new_customers_last_month: count(
            conn,
            "SELECT COUNT(*) FROM customers WHERE created_at>=?1",
            params![month_ago],
        )?,
        loans_to_deposits_ratio: percent(report.total_loans_disbursed, report.total_deposits),
    })
}
