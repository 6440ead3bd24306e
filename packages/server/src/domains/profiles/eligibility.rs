//! Eligibility checker - decides whether a profile may request matching.
//!
//! Pure functions over profile state. Ineligibility is reported as data
//! (the specific missing fields), never as an error.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::common::MissingField;
use crate::domains::profiles::models::profile::{Profile, Role};

/// Minimum patient age for matching.
pub const MINIMUM_AGE: i32 = 18;

/// Outcome of an eligibility check.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub missing: Vec<MissingField>,
}

/// Check whether a profile is complete enough to request matching.
///
/// Required: patient role, phone, date of birth (age >= 18), gender (the
/// matching policy is gender-paired), emergency contact name and phone.
pub fn check_eligibility(profile: &Profile) -> EligibilityReport {
    check_eligibility_on(profile, Utc::now().date_naive())
}

/// Same as [`check_eligibility`] with an explicit "today" for the age rule.
pub fn check_eligibility_on(profile: &Profile, today: NaiveDate) -> EligibilityReport {
    let mut missing = Vec::new();

    match profile.role.parse::<Role>() {
        Ok(role) if role.can_request_match() => {}
        _ => missing.push(MissingField::NotAPatient),
    }

    if is_blank(&profile.phone) {
        missing.push(MissingField::Phone);
    }

    match profile.date_of_birth {
        None => missing.push(MissingField::DateOfBirth),
        Some(dob) if age_on(dob, today) < MINIMUM_AGE => missing.push(MissingField::Underage),
        Some(_) => {}
    }

    if is_blank(&profile.gender) {
        missing.push(MissingField::Gender);
    }

    if is_blank(&profile.emergency_contact) {
        missing.push(MissingField::EmergencyContact);
    }

    if is_blank(&profile.emergency_phone) {
        missing.push(MissingField::EmergencyPhone);
    }

    EligibilityReport {
        eligible: missing.is_empty(),
        missing,
    }
}

/// Age in whole years: calendar-year difference, minus one if this year's
/// birthday has not yet passed.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::common::ProfileId;

    fn complete_patient() -> Profile {
        Profile {
            id: ProfileId::new(),
            user_id: Uuid::new_v4(),
            email: "p@example.org".to_string(),
            full_name: "Test Patient".to_string(),
            avatar_url: None,
            phone: Some("+15550100".to_string()),
            date_of_birth: Some(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap()),
            gender: Some("female".to_string()),
            emergency_contact: Some("A. Contact".to_string()),
            emergency_phone: Some("+15550101".to_string()),
            role: "patient".to_string(),
            is_verified: true,
            profile_completed: true,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_complete_patient_is_eligible() {
        let report = check_eligibility_on(&complete_patient(), today());
        assert!(report.eligible);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_missing_emergency_contact_reported() {
        let mut profile = complete_patient();
        profile.emergency_contact = None;
        let report = check_eligibility_on(&profile, today());
        assert!(!report.eligible);
        assert_eq!(report.missing, vec![MissingField::EmergencyContact]);
    }

    #[test]
    fn test_blank_phone_counts_as_missing() {
        let mut profile = complete_patient();
        profile.phone = Some("   ".to_string());
        let report = check_eligibility_on(&profile, today());
        assert_eq!(report.missing, vec![MissingField::Phone]);
    }

    #[test]
    fn test_underage_patient_rejected() {
        let mut profile = complete_patient();
        profile.date_of_birth = Some(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        let report = check_eligibility_on(&profile, today());
        assert_eq!(report.missing, vec![MissingField::Underage]);
    }

    #[test]
    fn test_counsellor_role_is_not_a_patient() {
        let mut profile = complete_patient();
        profile.role = "counsellor".to_string();
        let report = check_eligibility_on(&profile, today());
        assert_eq!(report.missing, vec![MissingField::NotAPatient]);
    }

    #[test]
    fn test_age_boundary_before_and_after_birthday() {
        let dob = NaiveDate::from_ymd_opt(2008, 3, 2).unwrap();
        // Day before 18th birthday
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()), 17);
        // On the 18th birthday
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()), 18);
    }
}
