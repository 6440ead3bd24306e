//! Integration tests for counsellor administration.

mod common;

use axum::extract::{Extension, Path};
use axum::Json;

use crate::common::{create_test_admin, create_test_counsellor, create_test_patient, TestHarness};
use server_core::domains::counsellors::models::{Counsellor, CounsellorStatus, NewCounsellor};
use server_core::domains::profiles::models::Gender;
use server_core::server::app::AppState;
use server_core::server::routes::counsellors::{update_counsellor_status, StatusChange};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn only_admins_may_change_counsellor_status(ctx: &TestHarness) {
    let counsellor = create_test_counsellor(Gender::Female, 4.0, 5, 0, &ctx.db_pool).await;
    let patient = create_test_patient(Gender::Female, &ctx.db_pool).await;
    let admin = create_test_admin(&ctx.db_pool).await;
    let state = AppState {
        deps: ctx.deps.clone(),
    };

    // A patient actor is rejected
    let result = update_counsellor_status(
        Extension(state.clone()),
        Path(counsellor.id),
        Json(StatusChange {
            actor_id: patient.id,
            status: CounsellorStatus::Suspended,
        }),
    )
    .await;
    assert!(result.is_err());

    // An admin suspends the counsellor
    let Json(suspended) = update_counsellor_status(
        Extension(state),
        Path(counsellor.id),
        Json(StatusChange {
            actor_id: admin.id,
            status: CounsellorStatus::Suspended,
        }),
    )
    .await
    .unwrap_or_else(|_| panic!("admin status change failed"));
    assert_eq!(suspended.status, "suspended");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn suspended_counsellors_leave_the_candidate_pool(ctx: &TestHarness) {
    let counsellor = create_test_counsellor(Gender::Male, 4.0, 5, 0, &ctx.db_pool).await;

    let candidates = Counsellor::find_candidates(Gender::Male, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);

    Counsellor::update_status(counsellor.id, CounsellorStatus::Suspended, &ctx.db_pool)
        .await
        .unwrap();

    let candidates = Counsellor::find_candidates(Gender::Male, &ctx.db_pool)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn newly_registered_counsellors_start_pending_and_unmatchable(ctx: &TestHarness) {
    let profile = create_test_patient(Gender::Female, &ctx.db_pool).await;
    let counsellor = Counsellor::register(
        NewCounsellor {
            profile_id: profile.id,
            gender: Gender::Female,
            max_patients: 5,
        },
        &ctx.db_pool,
    )
    .await
    .unwrap();
    assert_eq!(counsellor.status, "pending");

    let candidates = Counsellor::find_candidates(Gender::Female, &ctx.db_pool)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unavailable_counsellors_are_skipped(ctx: &TestHarness) {
    let counsellor = create_test_counsellor(Gender::Other, 4.0, 5, 0, &ctx.db_pool).await;

    Counsellor::set_availability(counsellor.id, false, &ctx.db_pool)
        .await
        .unwrap();

    let candidates = Counsellor::find_candidates(Gender::Other, &ctx.db_pool)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}
