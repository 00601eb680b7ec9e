use uuid::Uuid;

use crate::database::{
    models::{CleanupResponse, ModeratorSchedule},
    repositories::moderator_schedule as schedule_repo,
    transaction::{DatabaseTransaction, LockScope, lock},
};
use crate::error::AppError;

/// Ids of every row that shares its `(date, slot)` with an earlier-created row.
pub fn select_duplicates(schedules: &[ModeratorSchedule]) -> Vec<Uuid> {
    let mut ordered: Vec<&ModeratorSchedule> = schedules.iter().collect();
    ordered.sort_by_key(|s| (s.schedule_date, s.slot_type, s.created_at));

    ordered
        .windows(2)
        .filter(|pair| {
            (pair[0].schedule_date, pair[0].slot_type) == (pair[1].schedule_date, pair[1].slot_type)
        })
        .map(|pair| pair[1].id)
        .collect()
}

pub async fn cleanup_duplicates() -> Result<CleanupResponse, AppError> {
    let deleted_count = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            lock(tx, LockScope::ModeratorSchedules).await?;

            let schedules = schedule_repo::list_ordered(tx).await?;
            let duplicates = select_duplicates(&schedules);

            Ok(schedule_repo::delete_by_ids(tx, &duplicates).await?)
        })
    })
    .await?;

    log::info!("Removed {} duplicate moderator schedules", deleted_count);

    Ok(CleanupResponse {
        deleted_count,
        message: format!("{} duplicate schedules removed", deleted_count),
    })
}
