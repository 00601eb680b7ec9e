use std::collections::HashSet;

use chrono::NaiveDate;
use fellowship::database::models::{
    GenerateTeamsInput, GenerationAction, ModeratorScheduleInput, NewModeratorSchedule, SlotType,
};
use fellowship::database::repositories::{
    moderator_schedule as schedule_repo, prayer_team as team_repo,
};
use fellowship::database::transaction::DatabaseTransaction;
use fellowship::error::AppError;
use fellowship::services::{moderator_rotation, prayer_teams, schedule_cleanup};
use pretty_assertions::assert_eq;
use serial_test::serial;
use uuid::Uuid;

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week_input(start: NaiveDate, end: NaiveDate, replace_existing: bool) -> GenerateTeamsInput {
    GenerateTeamsInput {
        replace_existing,
        week_start: Some(start),
        week_end: Some(end),
    }
}

async fn stored_team_ids(start: NaiveDate, end: NaiveDate) -> HashSet<Uuid> {
    team_repo::list_by_week(start, end)
        .await
        .unwrap()
        .into_iter()
        .map(|team| team.id)
        .collect()
}

#[test]
#[serial]
fn test_second_generation_without_replace_keeps_first_teams() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        ctx.create_users(4).await;

        let first = prayer_teams::generate_teams(GenerateTeamsInput::default())
            .await
            .unwrap();
        assert_eq!(first.action, GenerationAction::Created);
        assert_eq!(first.count, 2);

        let err = prayer_teams::generate_teams(GenerateTeamsInput::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::TeamsAlreadyExist(start) if start == first.week_start),
            "got {:?}",
            err
        );

        let first_ids: HashSet<Uuid> = first.teams.iter().map(|team| team.id).collect();
        assert_eq!(
            stored_team_ids(first.week_start, first.week_end).await,
            first_ids
        );
    });
}

#[test]
#[serial]
fn test_replace_swaps_teams_instead_of_adding() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        ctx.create_users(5).await;
        let (start, end) = (date(2024, 3, 4), date(2024, 3, 10));

        let first = prayer_teams::generate_teams(week_input(start, end, false))
            .await
            .unwrap();
        assert_eq!(first.count, 3);

        let replaced = prayer_teams::generate_teams(week_input(start, end, true))
            .await
            .unwrap();
        assert_eq!(replaced.action, GenerationAction::Replaced);
        assert_eq!(replaced.count, 3);

        let stored = stored_team_ids(start, end).await;
        let replaced_ids: HashSet<Uuid> = replaced.teams.iter().map(|team| team.id).collect();
        assert_eq!(stored, replaced_ids);
        assert!(first.teams.iter().all(|team| !stored.contains(&team.id)));
    });
}

#[test]
#[serial]
fn test_team_starting_mid_week_blocks_generation_for_that_week() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        ctx.create_users(2).await;

        let mid_week = week_input(date(2024, 3, 6), date(2024, 3, 12), false);
        prayer_teams::generate_teams(mid_week).await.unwrap();

        let monday_week = week_input(date(2024, 3, 4), date(2024, 3, 10), false);
        let err = prayer_teams::generate_teams(monday_week).await.unwrap_err();
        assert!(matches!(err, AppError::TeamsAlreadyExist(_)), "got {:?}", err);

        // Starting after the range leaves the next week free
        let following = week_input(date(2024, 3, 13), date(2024, 3, 19), false);
        let next = prayer_teams::generate_teams(following).await.unwrap();
        assert_eq!(next.action, GenerationAction::Created);
    });
}

#[test]
#[serial]
fn test_generation_with_single_member_is_rejected() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        ctx.create_users(1).await;

        let err = prayer_teams::generate_teams(GenerateTeamsInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientMembers), "got {:?}", err);
    });
}

#[test]
#[serial]
fn test_schedule_generation_is_idempotent() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        ctx.create_users(3).await;

        let first = moderator_rotation::generate_schedule(Some(4)).await.unwrap();
        assert_eq!(first.count, 8);

        let second = moderator_rotation::generate_schedule(Some(4)).await.unwrap();
        assert_eq!(second.count, 0);

        let stored = schedule_repo::list_range(None, None).await.unwrap();
        assert_eq!(stored.len(), 8);
    });
}

#[test]
#[serial]
fn test_schedule_generation_without_users_fails() {
    common::setup_test_env();
    common::with_database(|_ctx| async move {
        let err = moderator_rotation::generate_schedule(None).await.unwrap_err();
        assert!(matches!(err, AppError::NoUsersAvailable), "got {:?}", err);
    });
}

#[test]
#[serial]
fn test_manual_schedule_conflicts_with_occupied_slot_but_not_itself() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        let users = ctx.create_users(2).await;
        let input = |user_id| ModeratorScheduleInput {
            user_id,
            schedule_date: date(2024, 3, 11),
            slot_type: SlotType::Monday,
            start_time: None,
            end_time: None,
        };

        let created = moderator_rotation::save_schedule(input(users[0].id), None)
            .await
            .unwrap();

        let err = moderator_rotation::save_schedule(input(users[1].id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ScheduleConflict(_)), "got {:?}", err);

        let updated = moderator_rotation::save_schedule(input(users[1].id), Some(created.id))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_id, users[1].id);
    });
}

#[test]
#[serial]
fn test_cleanup_keeps_earliest_row_per_slot() {
    common::setup_test_env();
    common::with_database(|ctx| async move {
        let users = ctx.create_users(1).await;
        let user_id = users[0].id;
        let monday = date(2024, 3, 11);

        let rows = vec![
            NewModeratorSchedule::auto(user_id, monday, SlotType::Monday),
            NewModeratorSchedule::auto(user_id, monday, SlotType::Monday),
            NewModeratorSchedule::auto(user_id, monday, SlotType::Monday),
            NewModeratorSchedule::auto(user_id, date(2024, 3, 16), SlotType::Saturday),
        ];
        let inserted = DatabaseTransaction::run(|tx| {
            Box::pin(async move { Ok(schedule_repo::insert_schedules(tx, &rows).await?) })
        })
        .await
        .unwrap();

        let first = schedule_cleanup::cleanup_duplicates().await.unwrap();
        assert_eq!(first.deleted_count, 2);

        let again = schedule_cleanup::cleanup_duplicates().await.unwrap();
        assert_eq!(again.deleted_count, 0);

        let remaining: HashSet<Uuid> = schedule_repo::list_range(None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|schedule| schedule.id)
            .collect();
        assert_eq!(remaining, HashSet::from([inserted[0].id, inserted[3].id]));
    });
}
