use super::*;
use rstest::rstest;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = LeaveRequestId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = CancellationId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_ids_are_time_ordered() {
    let first = LeaveRequestId::new();
    let second = LeaveRequestId::new();
    assert!(first <= second);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = LeaveRequestId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = LeaveRequestId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(LeaveRequestId::from_str("invalid").is_err());
}

#[rstest]
#[case("E001")]
#[case("99508")]
#[case("SBU-001")]
#[case("site_incharge_1")]
fn test_employee_id_accepts(#[case] raw: &str) {
    let id = EmployeeId::parse(raw).unwrap();
    assert_eq!(id.as_str(), raw);
}

#[test]
fn test_employee_id_trims() {
    let id = EmployeeId::parse("  HR001 ").unwrap();
    assert_eq!(id.as_str(), "HR001");
}

#[rstest]
#[case("", EmployeeIdError::Empty)]
#[case("   ", EmployeeIdError::Empty)]
#[case("E 001", EmployeeIdError::InvalidCharacter)]
#[case("E001/../x", EmployeeIdError::InvalidCharacter)]
#[case("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789", EmployeeIdError::TooLong)]
fn test_employee_id_rejects(#[case] raw: &str, #[case] expected: EmployeeIdError) {
    assert_eq!(EmployeeId::parse(raw), Err(expected));
}

#[test]
fn test_employee_id_serde_is_plain_string() {
    let id = EmployeeId::parse("E001").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"E001\"");

    let back: EmployeeId = serde_json::from_str("\"E001\"").unwrap();
    assert_eq!(back, id);

    assert!(serde_json::from_str::<EmployeeId>("\"\"").is_err());
}
