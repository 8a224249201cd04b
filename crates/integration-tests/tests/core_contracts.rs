//! Contracts shared by the admin and portal crates.

#![allow(clippy::unwrap_used)]

use esep_admin::models::{CategoryForm, category::CategoryDraft};
use esep_core::{AdminRole, Fee, PhoneNumber, Pricing, RegistrationStatus};

fn pricing(actual: &str, offer: &str) -> Pricing {
    Pricing::new(Fee::parse(actual).unwrap(), Fee::parse(offer).unwrap())
}

#[test]
fn test_trade_license_discount() {
    let p = pricing("500", "250");
    assert_eq!(p.discount_percent(), 50);
    assert_eq!(p.savings_display(), "250");
    assert!(!p.is_free());
}

#[test]
fn test_discount_edge_cases() {
    assert_eq!(pricing("0", "0").discount_percent(), 0);
    assert_eq!(pricing("300", "0").discount_percent(), 100);
    assert!(pricing("300", "0").is_free());
    // One third off rounds to the nearest whole percent
    assert_eq!(pricing("300", "200").discount_percent(), 33);
    // Offer above the actual fee is allowed and shows a negative discount
    assert!(pricing("100", "150").discount_percent() < 0);
}

#[test]
fn test_permission_matrix() {
    let super_admin = AdminRole::SuperAdmin.permissions();
    assert!(super_admin.can_read && super_admin.can_write && super_admin.can_delete);
    assert!(super_admin.can_manage_admins);

    let local = AdminRole::LocalAdmin.permissions();
    assert!(local.can_read && local.can_write);
    assert!(!local.can_delete && !local.can_manage_admins);

    let user = AdminRole::UserAdmin.permissions();
    assert!(user.can_read);
    assert!(!user.can_write && !user.can_delete && !user.can_manage_admins);
}

#[test]
fn test_category_form_requires_name_and_fees() {
    let form = CategoryForm {
        name: "Trade License".to_string(),
        actual_fee: "500".to_string(),
        offer_fee: String::new(),
        ..CategoryForm::default()
    };
    let err = form.validate().unwrap_err();
    assert_eq!(err.to_string(), "Please fill in all required fields.");
}

#[test]
fn test_category_form_builds_draft() {
    let form = CategoryForm {
        name: " Trade License ".to_string(),
        actual_fee: "500".to_string(),
        offer_fee: "250.00".to_string(),
        is_active: Some("on".to_string()),
        ..CategoryForm::default()
    };
    let CategoryDraft {
        name,
        pricing,
        is_active,
        is_highlighted,
        ..
    } = form.validate().unwrap();
    assert_eq!(name, "Trade License");
    assert_eq!(pricing.offer.to_string(), "250");
    assert!(is_active);
    assert!(!is_highlighted);
}

#[test]
fn test_status_round_trip_through_text() {
    for status in RegistrationStatus::ALL {
        assert_eq!(status.to_string().parse::<RegistrationStatus>().unwrap(), status);
    }
    assert_eq!(RegistrationStatus::default(), RegistrationStatus::Pending);
}

#[test]
fn test_phone_numbers_match_across_formats() {
    let a = PhoneNumber::parse("98765 43210").unwrap();
    let b = PhoneNumber::parse("+91-9876543210").unwrap();
    assert_eq!(a, b);
}
