use crate::announcements::models::AnnouncementList;
use crate::announcements::services as announcements;
use crate::common::errors::BusinessResult;
use crate::common::models::ensure_user;
use crate::cultures::services as cultures;
use crate::reagent_movements::models::MovementStat;
use crate::reagent_movements::services as movements;
use crate::reagents::models::ReagentList;
use crate::reagents::services as reagents;
use crate::tasks::models::TaskList;
use crate::tasks::services as tasks;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Items shown per dashboard widget.
pub const WIDGET_SIZE: u64 = 5;

#[derive(Serialize, ToSchema)]
pub struct Dashboard {
    pub reagent_count: u64,
    pub critical_reagents: Vec<ReagentList>,
    pub expiring_reagents: Vec<ReagentList>,
    pub open_task_count: u64,
    /// The user's overdue tasks, or every overdue task when no user is given.
    pub overdue_task_count: u64,
    pub user_tasks: Vec<TaskList>,
    /// Tasks assigned to the user, whatever their status.
    pub total_tasks: u64,
    /// Tasks assigned to the user that are still `new`.
    pub pending_tasks: u64,
    pub active_cultures: u64,
    pub movements_stats: Vec<MovementStat>,
    pub latest_announcements: Vec<AnnouncementList>,
    /// Present only when a non-blank search term was given.
    pub search: Option<SearchResults>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchResults {
    pub query: String,
    pub reagents: Vec<ReagentList>,
    pub tasks: Vec<TaskList>,
    pub announcements_count: u64,
    pub announcements_exist: bool,
}

async fn search(
    db: &DatabaseConnection,
    needle: &str,
    now: DateTime<Utc>,
) -> BusinessResult<SearchResults> {
    let announcements_count = announcements::matching_count(db, needle).await?;
    Ok(SearchResults {
        query: needle.to_string(),
        reagents: reagents::search_reagents(db, needle, now.date_naive(), WIDGET_SIZE).await?,
        tasks: tasks::search_tasks(db, needle, now, WIDGET_SIZE).await?,
        announcements_count,
        announcements_exist: announcements_count > 0,
    })
}

/// Collects every widget for `user_id` as of `now`. Without a user the personal widgets
/// stay empty and the overdue count covers the whole lab.
pub async fn build_dashboard(
    db: &DatabaseConnection,
    user_id: Option<Uuid>,
    query: Option<&str>,
    now: DateTime<Utc>,
) -> BusinessResult<Dashboard> {
    let today = now.date_naive();

    let (user_tasks, total_tasks, pending_tasks) = match user_id {
        Some(user_id) => {
            ensure_user(db, Some(user_id)).await?;
            let (total, pending) = tasks::task_counts_for_user(db, user_id).await?;
            let open = tasks::open_tasks_for_user(db, user_id, now, WIDGET_SIZE).await?;
            (open, total, pending)
        }
        None => (Vec::new(), 0, 0),
    };

    let search = match query.map(str::trim).filter(|needle| !needle.is_empty()) {
        Some(needle) => Some(search(db, needle, now).await?),
        None => None,
    };

    let dashboard = Dashboard {
        reagent_count: reagents::reagent_count(db).await?,
        critical_reagents: reagents::critical_reagents(db, today, Some(WIDGET_SIZE)).await?,
        expiring_reagents: reagents::expiring_reagents(db, today, Some(WIDGET_SIZE)).await?,
        open_task_count: tasks::open_task_count(db).await?,
        overdue_task_count: tasks::overdue_task_count(db, now, user_id).await?,
        user_tasks,
        total_tasks,
        pending_tasks,
        active_cultures: cultures::active_culture_count(db).await?,
        movements_stats: movements::movement_counts(db).await?,
        latest_announcements: announcements::feed(db, WIDGET_SIZE, 0).await?,
        search,
    };

    tracing::debug!(
        user_id = ?user_id,
        reagents = dashboard.reagent_count,
        open_tasks = dashboard.open_task_count,
        searched = dashboard.search.is_some(),
        "Built dashboard"
    );

    Ok(dashboard)
}
