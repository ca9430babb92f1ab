use super::*;

// =============================================================================
// Credentials
// =============================================================================

#[test]
fn credentials_validate_accepts_filled_form() {
    assert!(Credentials::new("ann@studio.test", "hunter22").validate().is_ok());
}

#[test]
fn credentials_validate_rejects_blank_email() {
    assert_eq!(Credentials::new("  ", "hunter22").validate(), Err(AuthError::InvalidCredentials));
}

#[test]
fn credentials_validate_rejects_empty_password() {
    assert_eq!(Credentials::new("ann@studio.test", "").validate(), Err(AuthError::InvalidCredentials));
}

#[test]
fn credentials_debug_redacts_password() {
    let debug = format!("{:?}", Credentials::new("ann@studio.test", "hunter22"));
    assert!(debug.contains("ann@studio.test"));
    assert!(!debug.contains("hunter22"));
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn registration_validate_accepts_plain_address() {
    assert!(Registration::new("ann@studio.test", "pw").validate().is_ok());
}

#[test]
fn registration_validate_rejects_malformed_addresses() {
    for email in ["", "ann", "@studio.test", "ann@", "a@b@c"] {
        assert_eq!(
            Registration::new(email, "pw").validate(),
            Err(AuthError::InvalidEmail),
            "expected InvalidEmail for {email:?}"
        );
    }
}

#[test]
fn registration_validate_rejects_empty_password() {
    assert_eq!(Registration::new("ann@studio.test", "").validate(), Err(AuthError::WeakCredential));
}

#[test]
fn registration_deserializes_without_display_name() {
    let reg: Registration = serde_json::from_str(r#"{"email":"ann@studio.test","password":"pw"}"#).unwrap();
    assert!(reg.display_name.is_none());
}

#[test]
fn registration_debug_redacts_password() {
    let debug = format!("{:?}", Registration::new("ann@studio.test", "s3cret").with_display_name("Ann"));
    assert!(debug.contains("Ann"));
    assert!(!debug.contains("s3cret"));
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn identity_serializes_optional_fields_as_null() {
    let identity = Identity { uid: "u1".into(), email: None, display_name: None };
    let value = serde_json::to_value(&identity).unwrap();
    assert_eq!(value["uid"], "u1");
    assert!(value["email"].is_null());
    assert!(value["display_name"].is_null());
}
