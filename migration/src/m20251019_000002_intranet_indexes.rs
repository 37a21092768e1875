use crate::m20251019_000001_create_intranet_schema::{
    Announcements, ReagentMovements, Reagents, Tasks,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============ REAGENTS ============
        manager
            .create_index(
                Index::create()
                    .name("idx_reagents_name")
                    .table(Reagents::Table)
                    .col(Reagents::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reagents_category")
                    .table(Reagents::Table)
                    .col(Reagents::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reagents_expiry_date")
                    .table(Reagents::Table)
                    .col(Reagents::ExpiryDate)
                    .to_owned(),
            )
            .await?;

        // ============ REAGENT MOVEMENTS ============
        // History lookups are always "movements of one reagent, newest first"
        manager
            .create_index(
                Index::create()
                    .name("idx_reagent_movements_reagent_id_date")
                    .table(ReagentMovements::Table)
                    .col(ReagentMovements::ReagentId)
                    .col(ReagentMovements::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reagent_movements_user_id")
                    .table(ReagentMovements::Table)
                    .col(ReagentMovements::UserId)
                    .to_owned(),
            )
            .await?;

        // ============ TASKS ============
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_status_deadline")
                    .table(Tasks::Table)
                    .col(Tasks::Status)
                    .col(Tasks::Deadline)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_assignee_id")
                    .table(Tasks::Table)
                    .col(Tasks::AssigneeId)
                    .to_owned(),
            )
            .await?;

        // ============ ANNOUNCEMENTS ============
        manager
            .create_index(
                Index::create()
                    .name("idx_announcements_pinned_published")
                    .table(Announcements::Table)
                    .col(Announcements::IsPinned)
                    .col(Announcements::PublishedAt)
                    .to_owned(),
            )
            .await?;

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE INDEX IF NOT EXISTS idx_reagents_fulltext ON reagents USING GIN (to_tsvector('english', name))",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("DROP INDEX IF EXISTS idx_reagents_fulltext")
                .await
                .ok();
        }

        manager
            .drop_index(Index::drop().name("idx_announcements_pinned_published").table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tasks_assignee_id").table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tasks_status_deadline").table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reagent_movements_user_id").table(ReagentMovements::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reagent_movements_reagent_id_date").table(ReagentMovements::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reagents_expiry_date").table(Reagents::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reagents_category").table(Reagents::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reagents_name").table(Reagents::Table).to_owned())
            .await?;

        Ok(())
    }
}
