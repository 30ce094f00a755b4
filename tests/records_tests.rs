// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use bankdesk::BankError;
use bankdesk::models::{CustomerStatus, EmployeePosition, EmployeeStatus, LoanType};
use bankdesk::records::customers::{self, CustomerUpdate};
use bankdesk::records::employees::{self, EmployeeUpdate, NewEmployee};
use bankdesk::records::{account_types, admins, branches, loan_options};
use common::{dec, new_branch, new_customer, setup, today};

#[test]
fn customer_fields_are_validated() {
    let bank = setup();
    let mut bad_pan = new_customer(2);
    bad_pan.pan = "ABC1234567".into();
    let mut bad_email = new_customer(3);
    bad_email.email = "not-an-email".into();
    let mut short_phone = new_customer(4);
    short_phone.contact_number = "12345".into();
    let mut long_name = new_customer(5);
    long_name.first_name = "n".repeat(41);
    let mut bad_gender = new_customer(6);
    bad_gender.gender = "?".into();

    for (new, field) in [
        (bad_pan, "pan"),
        (bad_email, "email"),
        (short_phone, "contact_number"),
        (long_name, "first_name"),
        (bad_gender, "gender"),
    ] {
        match customers::create(&bank.conn, &new, today()).unwrap_err() {
            BankError::Validation { field: f, .. } => assert_eq!(f, field),
            other => panic!("{field}: {other:?}"),
        }
    }
}

#[test]
fn customer_input_is_normalised() {
    let bank = setup();
    let mut new = new_customer(7);
    new.pan = "abcde0007f".into();
    new.email = "Harry7@Hogwarts.EDU".into();
    new.gender = "female".into();
    new.middle_name = Some("James".into());
    let c = customers::create(&bank.conn, &new, today()).unwrap();
    assert_eq!(c.pan, "ABCDE0007F");
    assert_eq!(c.email, "harry7@hogwarts.edu");
    assert_eq!(c.gender, "Female");
    assert_eq!(c.full_name(), "Harry7 James Potter");
    assert_eq!(c.status, CustomerStatus::Active);
}

#[test]
fn duplicate_customer_identity_is_a_conflict() {
    let bank = setup();
    let mut dup = new_customer(8);
    dup.email = "harry1@hogwarts.edu".into();
    let err = customers::create(&bank.conn, &dup, today()).unwrap_err();
    assert!(matches!(err, BankError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn customer_update_and_deactivate() {
    let bank = setup();
    let updated = customers::update(
        &bank.conn,
        bank.customer_id,
        &CustomerUpdate {
            address: Some("The Burrow".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.address, "The Burrow");
    assert_eq!(updated.email, "harry1@hogwarts.edu");

    let off = customers::deactivate(&bank.conn, bank.customer_id).unwrap();
    assert_eq!(off.status, CustomerStatus::Inactive);
    assert!(matches!(
        customers::deactivate(&bank.conn, bank.customer_id).unwrap_err(),
        BankError::Conflict(_)
    ));
    assert_eq!(
        customers::list(&bank.conn, Some(CustomerStatus::Inactive))
            .unwrap()
            .len(),
        1
    );
    assert!(
        customers::list(&bank.conn, Some(CustomerStatus::Active))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn employee_lifecycle() {
    let bank = setup();
    let e = employees::update(
        &bank.conn,
        bank.employee_id,
        &EmployeeUpdate {
            position: Some(EmployeePosition::AssistantManager),
            phone_number: Some("9000000009".into()),
            email: None,
        },
    )
    .unwrap();
    assert_eq!(e.position, EmployeePosition::AssistantManager);
    assert_eq!(e.phone_number, "9000000009");

    let err = employees::add(
        &bank.conn,
        &NewEmployee {
            first_name: "Severus".into(),
            last_name: "Snape".into(),
            email: "minerva@hogwarts.edu".into(),
            phone_number: "9000000002".into(),
            position: EmployeePosition::Teller,
        },
        today(),
    )
    .unwrap_err();
    assert!(matches!(err, BankError::Conflict(_)));

    let closed = employees::deactivate(&bank.conn, bank.employee_id).unwrap();
    assert_eq!(closed.status, EmployeeStatus::Closed);
    assert_eq!(employees::list(&bank.conn).unwrap().len(), 1);
    assert!(matches!(
        employees::get(&bank.conn, 5).unwrap_err(),
        BankError::EmployeeNotFound(5)
    ));
}

#[test]
fn admins_are_listed() {
    let bank = setup();
    admins::add(&bank.conn, "Albus Dumbledore", "albus@hogwarts.edu", today()).unwrap();
    let err = admins::add(&bank.conn, "Albus Again", "ALBUS@hogwarts.edu", today()).unwrap_err();
    assert!(matches!(err, BankError::Conflict(_)));
    let list = admins::list(&bank.conn).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Albus Dumbledore");
}

#[test]
fn branches_need_unique_ifsc() {
    let bank = setup();
    let err = branches::add(&bank.conn, &new_branch("hogw0000001")).unwrap_err();
    assert!(matches!(err, BankError::Conflict(_)));
    let err = branches::add(&bank.conn, &new_branch("SHORT")).unwrap_err();
    assert!(matches!(err, BankError::Validation { field: "ifsc_code", .. }));
    branches::add(&bank.conn, &new_branch("HOGW0000002")).unwrap();
    assert_eq!(branches::list(&bank.conn).unwrap().len(), 2);
}

#[test]
fn account_types_are_seeded() {
    let bank = setup();
    let names: Vec<String> = account_types::list(&bank.conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["Savings", "Salary", "Business"]);
    assert_eq!(account_types::name_by_id(&bank.conn, 2).unwrap(), "Salary");
    assert!(matches!(
        account_types::name_by_id(&bank.conn, 4).unwrap_err(),
        BankError::AccountTypeNotFound(4)
    ));
}

#[test]
fn loan_options_are_validated() {
    let bank = setup();
    let err = loan_options::add(&bank.conn, LoanType::Car, dec("0"), dec("9"), 24).unwrap_err();
    assert!(matches!(err, BankError::InvalidAmount(_)));
    let err =
        loan_options::add(&bank.conn, LoanType::Car, dec("1000"), dec("101"), 24).unwrap_err();
    assert!(matches!(err, BankError::Validation { .. }));
    let err = loan_options::add(&bank.conn, LoanType::Car, dec("1000"), dec("9"), 0).unwrap_err();
    assert!(matches!(err, BankError::Validation { .. }));

    let car = loan_options::add(&bank.conn, LoanType::Car, dec("800000"), dec("9.25"), 60).unwrap();
    let fetched = loan_options::get(&bank.conn, car.id).unwrap();
    assert_eq!(fetched.interest_rate, dec("9.25"));
    assert_eq!(loan_options::list(&bank.conn).unwrap().len(), 2);
}
