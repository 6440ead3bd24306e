//! Test fixtures for profiles and counsellors.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::domains::counsellors::models::{Counsellor, CounsellorStatus, NewCounsellor};
use server_core::domains::profiles::models::{Gender, NewProfile, Profile, ProfilePatch, Role};

/// An eligible patient: every matching field present, well over the age floor.
pub async fn create_test_patient(gender: Gender, pool: &PgPool) -> Profile {
    let profile = Profile::create(
        NewProfile {
            user_id: Uuid::new_v4(),
            email: format!("patient-{}@example.org", Uuid::new_v4().simple()),
            full_name: "Test Patient".to_string(),
            role: Role::Patient,
            gender: Some(gender),
        },
        pool,
    )
    .await
    .expect("Failed to create patient profile");

    Profile::update_details(
        profile.id,
        ProfilePatch {
            phone: Some("+27 82 000 0000".to_string()),
            date_of_birth: Some(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap()),
            emergency_contact: Some("Next Of Kin".to_string()),
            emergency_phone: Some("+27 82 111 1111".to_string()),
            ..Default::default()
        },
        pool,
    )
    .await
    .expect("Failed to complete patient profile")
    .expect("Patient profile vanished")
}

/// A patient missing the emergency-contact fields, so ineligible for matching.
pub async fn create_incomplete_patient(gender: Gender, pool: &PgPool) -> Profile {
    let profile = Profile::create(
        NewProfile {
            user_id: Uuid::new_v4(),
            email: format!("patient-{}@example.org", Uuid::new_v4().simple()),
            full_name: "Incomplete Patient".to_string(),
            role: Role::Patient,
            gender: Some(gender),
        },
        pool,
    )
    .await
    .expect("Failed to create patient profile");

    Profile::update_details(
        profile.id,
        ProfilePatch {
            phone: Some("+27 82 000 0000".to_string()),
            date_of_birth: Some(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap()),
            ..Default::default()
        },
        pool,
    )
    .await
    .expect("Failed to update patient profile")
    .expect("Patient profile vanished")
}

/// An approved, available counsellor with the given rating and load.
pub async fn create_test_counsellor(
    gender: Gender,
    rating: f64,
    max_patients: i32,
    current_patients: i32,
    pool: &PgPool,
) -> Counsellor {
    let profile = Profile::create(
        NewProfile {
            user_id: Uuid::new_v4(),
            email: format!("counsellor-{}@example.org", Uuid::new_v4().simple()),
            full_name: "Test Counsellor".to_string(),
            role: Role::Counsellor,
            gender: Some(gender),
        },
        pool,
    )
    .await
    .expect("Failed to create counsellor profile");

    let counsellor = Counsellor::register(
        NewCounsellor {
            profile_id: profile.id,
            gender,
            max_patients,
        },
        pool,
    )
    .await
    .expect("Failed to register counsellor");

    Counsellor::update_status(counsellor.id, CounsellorStatus::Approved, pool)
        .await
        .expect("Failed to approve counsellor");

    // Rating and pre-existing load have no public setter
    sqlx::query("UPDATE counsellors SET rating = $2, current_patients = $3 WHERE id = $1")
        .bind(counsellor.id)
        .bind(rating)
        .bind(current_patients)
        .execute(pool)
        .await
        .expect("Failed to seed counsellor state");

    Counsellor::find_by_id(counsellor.id, pool)
        .await
        .expect("Failed to reload counsellor")
        .expect("Counsellor vanished")
}

/// An admin profile for operations gated on the admin role.
pub async fn create_test_admin(pool: &PgPool) -> Profile {
    Profile::create(
        NewProfile {
            user_id: Uuid::new_v4(),
            email: format!("admin-{}@example.org", Uuid::new_v4().simple()),
            full_name: "Test Admin".to_string(),
            role: Role::Admin,
            gender: None,
        },
        pool,
    )
    .await
    .expect("Failed to create admin profile")
}
