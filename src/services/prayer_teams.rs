use rand::{Rng, seq::SliceRandom};
use uuid::Uuid;

use crate::database::{
    models::{
        GenerateTeamsInput, GenerateTeamsResponse, GenerationAction, NewPrayerTeam, PrayerTeam,
        PrayerTeamInput,
    },
    repositories::{prayer_team as team_repo, user as user_repo},
    transaction::{DatabaseTransaction, LockScope, lock},
};
use crate::error::AppError;
use crate::services::week::{self, WeekRange};

/// Shuffles `members` uniformly and pairs them off in order. With an odd count
/// the last member is also teamed with the first, so that member prays twice.
pub fn pair_members<R: Rng + ?Sized>(
    members: &[Uuid],
    rng: &mut R,
) -> Result<Vec<(Uuid, Uuid)>, AppError> {
    if members.len() < 2 {
        return Err(AppError::InsufficientMembers);
    }

    let mut shuffled = members.to_vec();
    shuffled.shuffle(rng);

    let mut pairs: Vec<(Uuid, Uuid)> = shuffled
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    if let [.., leftover] = shuffled.chunks_exact(2).remainder() {
        pairs.push((*leftover, shuffled[0]));
    }

    Ok(pairs)
}

/// Decides what a generation run does given how many teams the week already has.
pub fn resolve_generation(
    existing: usize,
    replace_existing: bool,
    week: &WeekRange,
) -> Result<GenerationAction, AppError> {
    match (existing, replace_existing) {
        (0, _) => Ok(GenerationAction::Created),
        (_, true) => Ok(GenerationAction::Replaced),
        (_, false) => Err(AppError::TeamsAlreadyExist(week.start)),
    }
}

/// Rejects self-pairing, and either member already serving in a team whose
/// range intersects `week`. `excluding` is the team being edited.
pub fn check_conflict(
    member1_id: Uuid,
    member2_id: Uuid,
    week: &WeekRange,
    teams: &[PrayerTeam],
    excluding: Option<Uuid>,
) -> Result<(), AppError> {
    if member1_id == member2_id {
        return Err(AppError::TeamConflict(
            "a member cannot be paired with themselves".to_string(),
        ));
    }

    let clash = teams
        .iter()
        .filter(|team| Some(team.id) != excluding)
        .filter(|team| week.overlaps(team.week_start, team.week_end))
        .find_map(|team| {
            [member1_id, member2_id]
                .into_iter()
                .find(|member| team.includes(*member))
                .map(|member| (member, team))
        });

    match clash {
        Some((member, team)) => Err(AppError::TeamConflict(format!(
            "member {} is already in a team for {} to {}",
            member, team.week_start, team.week_end
        ))),
        None => Ok(()),
    }
}

pub async fn generate_teams(input: GenerateTeamsInput) -> Result<GenerateTeamsResponse, AppError> {
    let target = WeekRange::resolve(input.week_start, input.week_end, week::today())?;
    let replace_existing = input.replace_existing;

    let members: Vec<Uuid> = user_repo::get_all_users()
        .await?
        .into_iter()
        .map(|user| user.id)
        .collect();

    let rows: Vec<NewPrayerTeam> = pair_members(&members, &mut rand::rng())?
        .into_iter()
        .map(|(member1_id, member2_id)| NewPrayerTeam {
            member1_id,
            member2_id,
            week_start: target.start,
            week_end: target.end,
        })
        .collect();

    let (action, teams) = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            lock(tx, LockScope::PrayerTeams).await?;

            let existing = team_repo::find_by_week(tx, target.start, target.end).await?;
            let action = resolve_generation(existing.len(), replace_existing, &target)?;

            if action == GenerationAction::Replaced {
                let removed = team_repo::delete_by_week(tx, target.start, target.end).await?;
                log::info!(
                    "Removed {} prayer teams for week starting {}",
                    removed,
                    target.start
                );
            }

            let teams = team_repo::insert_teams(tx, &rows).await?;
            Ok((action, teams))
        })
    })
    .await?;

    log::info!(
        "Prayer teams {:?} for {} to {}: {} teams",
        action,
        target.start,
        target.end,
        teams.len()
    );

    Ok(GenerateTeamsResponse {
        count: teams.len(),
        action,
        week_start: target.start,
        week_end: target.end,
        teams,
    })
}

async fn ensure_members_exist(member1_id: Uuid, member2_id: Uuid) -> Result<(), AppError> {
    for member_id in [member1_id, member2_id] {
        if user_repo::find_by_id(member_id).await?.is_none() {
            return Err(AppError::MemberNotFound(member_id));
        }
    }
    Ok(())
}

/// Creates a team by hand, or edits `existing_id` when given.
pub async fn save_team(
    input: PrayerTeamInput,
    existing_id: Option<Uuid>,
) -> Result<PrayerTeam, AppError> {
    let week = WeekRange::resolve(input.week_start, input.week_end, week::today())?;
    let (member1_id, member2_id) = (input.member1_id, input.member2_id);

    // Self-pairing is rejected before any lookup
    check_conflict(member1_id, member2_id, &week, &[], existing_id)?;
    ensure_members_exist(member1_id, member2_id).await?;

    let row = NewPrayerTeam {
        member1_id,
        member2_id,
        week_start: week.start,
        week_end: week.end,
    };

    DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            lock(tx, LockScope::PrayerTeams).await?;

            let teams = team_repo::find_overlapping_for_members(
                tx, member1_id, member2_id, week.start, week.end,
            )
            .await?;
            check_conflict(member1_id, member2_id, &week, &teams, existing_id)?;

            match existing_id {
                Some(id) => team_repo::update_team(tx, id, &row)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Prayer team not found".to_string())),
                None => team_repo::insert_teams(tx, std::slice::from_ref(&row))
                    .await?
                    .pop()
                    .ok_or_else(|| {
                        AppError::internal_server_error_message("prayer team insert returned no row")
                    }),
            }
        })
    })
    .await
}

/// Deletes every team of `week`; returns how many were removed.
pub async fn clear_week(week: WeekRange) -> Result<u64, AppError> {
    let removed = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            lock(tx, LockScope::PrayerTeams).await?;
            Ok(team_repo::delete_by_week(tx, week.start, week.end).await?)
        })
    })
    .await?;

    log::info!(
        "Cleared {} prayer teams for {} to {}",
        removed,
        week.start,
        week.end
    );

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    fn members(count: usize) -> Vec<Uuid> {
        (0..count).map(|_| Uuid::new_v4()).collect()
    }

    fn appearances(pairs: &[(Uuid, Uuid)]) -> HashMap<Uuid, usize> {
        let mut counts = HashMap::new();
        for (a, b) in pairs {
            *counts.entry(*a).or_insert(0) += 1;
            *counts.entry(*b).or_insert(0) += 1;
        }
        counts
    }

    fn week() -> WeekRange {
        week::week_range(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
    }

    fn team(member1_id: Uuid, member2_id: Uuid, range: WeekRange) -> PrayerTeam {
        PrayerTeam {
            id: Uuid::new_v4(),
            member1_id,
            member2_id,
            week_start: range.start,
            week_end: range.end,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fewer_than_two_members_cannot_be_paired() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            pair_members(&[], &mut rng),
            Err(AppError::InsufficientMembers)
        ));
        assert!(matches!(
            pair_members(&members(1), &mut rng),
            Err(AppError::InsufficientMembers)
        ));
    }

    #[test]
    fn even_roster_pairs_everyone_exactly_once() {
        let mut rng = StdRng::seed_from_u64(42);
        for count in [2, 4, 10, 30] {
            let roster = members(count);
            let pairs = pair_members(&roster, &mut rng).unwrap();

            assert_eq!(pairs.len(), count / 2);
            assert!(pairs.iter().all(|(a, b)| a != b));

            let counts = appearances(&pairs);
            assert_eq!(counts.len(), count);
            assert!(roster.iter().all(|m| counts[m] == 1));
        }
    }

    #[test]
    fn odd_roster_doubles_up_the_first_shuffled_member() {
        let mut rng = StdRng::seed_from_u64(3);
        for count in [3, 5, 11] {
            let roster = members(count);
            let pairs = pair_members(&roster, &mut rng).unwrap();

            assert_eq!(pairs.len(), count.div_ceil(2));
            assert!(pairs.iter().all(|(a, b)| a != b));

            let counts = appearances(&pairs);
            let doubled: Vec<_> = counts.iter().filter(|(_, n)| **n == 2).collect();
            assert_eq!(doubled.len(), 1);
            assert_eq!(counts.values().filter(|n| **n == 1).count(), count - 1);

            // The wraparound team ends with the first member of the shuffle
            let (_, first_of_shuffle) = pairs.last().unwrap();
            assert_eq!(pairs[0].0, *first_of_shuffle);
            assert_eq!(doubled[0].0, first_of_shuffle);
        }
    }

    #[test]
    fn shuffle_depends_on_the_random_source() {
        let roster = members(12);
        let first = pair_members(&roster, &mut StdRng::seed_from_u64(1)).unwrap();
        let same = pair_members(&roster, &mut StdRng::seed_from_u64(1)).unwrap();
        let other = pair_members(&roster, &mut StdRng::seed_from_u64(2)).unwrap();

        assert_eq!(first, same);
        assert_ne!(first, other);
    }

    #[test]
    fn existing_teams_are_rejected_unless_replacing() {
        let week = week();

        assert_eq!(
            resolve_generation(0, false, &week).unwrap(),
            GenerationAction::Created
        );
        assert_eq!(
            resolve_generation(0, true, &week).unwrap(),
            GenerationAction::Created
        );
        assert_eq!(
            resolve_generation(3, true, &week).unwrap(),
            GenerationAction::Replaced
        );
        assert!(matches!(
            resolve_generation(3, false, &week),
            Err(AppError::TeamsAlreadyExist(start)) if start == week.start
        ));
    }

    #[test]
    fn self_pairing_is_always_a_conflict() {
        let member = Uuid::new_v4();
        assert!(matches!(
            check_conflict(member, member, &week(), &[], None),
            Err(AppError::TeamConflict(_))
        ));
    }

    #[test]
    fn member_booked_in_overlapping_week_is_a_conflict() {
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let this_week = week();
        let booked = vec![team(a, c, this_week)];

        assert!(matches!(
            check_conflict(a, b, &this_week, &booked, None),
            Err(AppError::TeamConflict(_))
        ));
        assert!(matches!(
            check_conflict(b, c, &this_week, &booked, None),
            Err(AppError::TeamConflict(_))
        ));
        assert!(check_conflict(b, d, &this_week, &booked, None).is_ok());
    }

    #[test]
    fn other_weeks_and_the_edited_team_do_not_conflict() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let this_week = week();
        let next_week = week::week_range(this_week.end.succ_opt().unwrap());

        let last_weeks_team = team(a, b, next_week);
        assert!(check_conflict(a, b, &this_week, &[last_weeks_team], None).is_ok());

        let current = team(a, b, this_week);
        let current_id = current.id;
        assert!(check_conflict(b, a, &this_week, &[current], Some(current_id)).is_ok());
    }
}
