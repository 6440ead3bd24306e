//! Integration tests for the profile store.

mod common;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::common::{create_incomplete_patient, TestHarness};
use server_core::domains::profiles::models::{Gender, NewProfile, Profile, ProfilePatch, Role};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn completion_flag_tracks_the_patched_fields(ctx: &TestHarness) {
    let profile = create_incomplete_patient(Gender::Female, &ctx.db_pool).await;
    assert!(!profile.profile_completed);

    // Supplying the missing emergency fields flips the flag in the same commit
    let profile = Profile::update_details(
        profile.id,
        ProfilePatch {
            emergency_contact: Some("Next Of Kin".to_string()),
            emergency_phone: Some("+27 82 111 1111".to_string()),
            ..Default::default()
        },
        &ctx.db_pool,
    )
    .await
    .unwrap()
    .unwrap();
    assert!(profile.profile_completed);
    assert_eq!(profile.emergency_contact.as_deref(), Some("Next Of Kin"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn non_patient_roles_are_complete_without_matching_fields(ctx: &TestHarness) {
    let profile = Profile::create(
        NewProfile {
            user_id: Uuid::new_v4(),
            email: format!("c-{}@example.org", Uuid::new_v4().simple()),
            full_name: "A Counsellor".to_string(),
            role: Role::Counsellor,
            gender: Some(Gender::Male),
        },
        &ctx.db_pool,
    )
    .await
    .unwrap();

    let profile = Profile::update_details(
        profile.id,
        ProfilePatch {
            full_name: Some("A. Counsellor".to_string()),
            ..Default::default()
        },
        &ctx.db_pool,
    )
    .await
    .unwrap()
    .unwrap();
    assert!(profile.profile_completed);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn patching_a_missing_profile_returns_none(ctx: &TestHarness) {
    let result = Profile::update_details(
        server_core::common::ProfileId::new(),
        ProfilePatch {
            date_of_birth: Some(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
            ..Default::default()
        },
        &ctx.db_pool,
    )
    .await
    .unwrap();
    assert!(result.is_none());
}
