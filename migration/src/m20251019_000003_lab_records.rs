use crate::m20251019_000001_create_intranet_schema::{
    Reagents, Tasks, Users, id_column, timestamp_column,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Nullable reference to a user that survives the user's deletion.
fn user_reference<T: IntoIden + 'static, C: IntoIden + 'static>(
    name: &str,
    table: T,
    column: C,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::SetNull)
        .on_update(ForeignKeyAction::NoAction)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // Recipes
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, Recipes::Id)?)
                    .col(ColumnDef::new(Recipes::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Recipes::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Recipes::AuthorId).uuid())
                    .col(
                        ColumnDef::new(Recipes::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Recipes::ApprovedAt).timestamp_with_time_zone())
                    .col(&mut timestamp_column(Recipes::CreatedAt))
                    .col(&mut timestamp_column(Recipes::LastUpdated))
                    .foreign_key(&mut user_reference(
                        "fk_recipes_author_id",
                        Recipes::Table,
                        Recipes::AuthorId,
                    ))
                    .to_owned(),
            )
            .await?;

        // Recipe ingredients
        manager
            .create_table(
                Table::create()
                    .table(RecipeReagents::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, RecipeReagents::Id)?)
                    .col(ColumnDef::new(RecipeReagents::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(RecipeReagents::ReagentId).uuid().not_null())
                    .col(
                        ColumnDef::new(RecipeReagents::Quantity)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(RecipeReagents::Quantity).gt(0)),
                    )
                    .col(
                        ColumnDef::new(RecipeReagents::Unit)
                            .string_len(10)
                            .not_null()
                            .default("ml"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_reagents_recipe_id")
                            .from(RecipeReagents::Table, RecipeReagents::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_reagents_reagent_id")
                            .from(RecipeReagents::Table, RecipeReagents::ReagentId)
                            .to(Reagents::Table, Reagents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_reagents_recipe_reagent_unique")
                    .table(RecipeReagents::Table)
                    .col(RecipeReagents::RecipeId)
                    .col(RecipeReagents::ReagentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Cultures
        manager
            .create_table(
                Table::create()
                    .table(Cultures::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, Cultures::Id)?)
                    .col(ColumnDef::new(Cultures::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Cultures::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(&mut timestamp_column(Cultures::SeedingDate))
                    .col(
                        ColumnDef::new(Cultures::PassageNumber)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Cultures::PassageNumber).gte(0)),
                    )
                    .col(ColumnDef::new(Cultures::RecipeId).uuid())
                    .col(ColumnDef::new(Cultures::ResponsibleId).uuid())
                    .col(ColumnDef::new(Cultures::Notes).text().not_null().default(""))
                    .col(&mut timestamp_column(Cultures::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cultures_recipe_id")
                            .from(Cultures::Table, Cultures::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(&mut user_reference(
                        "fk_cultures_responsible_id",
                        Cultures::Table,
                        Cultures::ResponsibleId,
                    ))
                    .to_owned(),
            )
            .await?;

        // Culture event log
        manager
            .create_table(
                Table::create()
                    .table(CultureEvents::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, CultureEvents::Id)?)
                    .col(ColumnDef::new(CultureEvents::CultureId).uuid().not_null())
                    .col(
                        ColumnDef::new(CultureEvents::EventType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(&mut timestamp_column(CultureEvents::Date))
                    .col(
                        ColumnDef::new(CultureEvents::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(CultureEvents::UserId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_culture_events_culture_id")
                            .from(CultureEvents::Table, CultureEvents::CultureId)
                            .to(Cultures::Table, Cultures::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(&mut user_reference(
                        "fk_culture_events_user_id",
                        CultureEvents::Table,
                        CultureEvents::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // Task comments
        manager
            .create_table(
                Table::create()
                    .table(TaskComments::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, TaskComments::Id)?)
                    .col(ColumnDef::new(TaskComments::TaskId).uuid().not_null())
                    .col(ColumnDef::new(TaskComments::UserId).uuid())
                    .col(ColumnDef::new(TaskComments::Text).text().not_null())
                    .col(&mut timestamp_column(TaskComments::Date))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_comments_task_id")
                            .from(TaskComments::Table, TaskComments::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(&mut user_reference(
                        "fk_task_comments_user_id",
                        TaskComments::Table,
                        TaskComments::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // Calendar
        manager
            .create_table(
                Table::create()
                    .table(CalendarEvents::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, CalendarEvents::Id)?)
                    .col(
                        ColumnDef::new(CalendarEvents::Subject)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::StartDatetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CalendarEvents::EndDatetime).timestamp_with_time_zone())
                    .col(ColumnDef::new(CalendarEvents::OrganizerId).uuid())
                    .col(
                        ColumnDef::new(CalendarEvents::Location)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(&mut user_reference(
                        "fk_calendar_events_organizer_id",
                        CalendarEvents::Table,
                        CalendarEvents::OrganizerId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CalendarEventParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CalendarEventParticipants::EventId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEventParticipants::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CalendarEventParticipants::EventId)
                            .col(CalendarEventParticipants::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_event_participants_event_id")
                            .from(
                                CalendarEventParticipants::Table,
                                CalendarEventParticipants::EventId,
                            )
                            .to(CalendarEvents::Table, CalendarEvents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_event_participants_user_id")
                            .from(
                                CalendarEventParticipants::Table,
                                CalendarEventParticipants::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Document templates: metadata only, the file lives elsewhere
        manager
            .create_table(
                Table::create()
                    .table(DocumentTemplates::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, DocumentTemplates::Id)?)
                    .col(
                        ColumnDef::new(DocumentTemplates::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentTemplates::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(DocumentTemplates::FileUrl).text().not_null())
                    .col(ColumnDef::new(DocumentTemplates::UploadedById).uuid())
                    .col(&mut timestamp_column(DocumentTemplates::UploadedAt))
                    .foreign_key(&mut user_reference(
                        "fk_document_templates_uploaded_by_id",
                        DocumentTemplates::Table,
                        DocumentTemplates::UploadedById,
                    ))
                    .to_owned(),
            )
            .await?;

        // ============ INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_status")
                    .table(Recipes::Table)
                    .col(Recipes::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cultures_status_seeding_date")
                    .table(Cultures::Table)
                    .col(Cultures::Status)
                    .col(Cultures::SeedingDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_culture_events_culture_id_date")
                    .table(CultureEvents::Table)
                    .col(CultureEvents::CultureId)
                    .col(CultureEvents::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_comments_task_id_date")
                    .table(TaskComments::Table)
                    .col(TaskComments::TaskId)
                    .col(TaskComments::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calendar_events_start_datetime")
                    .table(CalendarEvents::Table)
                    .col(CalendarEvents::StartDatetime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calendar_event_participants_user_id")
                    .table(CalendarEventParticipants::Table)
                    .col(CalendarEventParticipants::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentTemplates::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(CalendarEventParticipants::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CalendarEvents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskComments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CultureEvents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cultures::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeReagents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    Name,
    Description,
    AuthorId,
    Status,
    ApprovedAt,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum RecipeReagents {
    Table,
    Id,
    RecipeId,
    ReagentId,
    Quantity,
    Unit,
}

#[derive(DeriveIden)]
enum Cultures {
    Table,
    Id,
    Name,
    Status,
    SeedingDate,
    PassageNumber,
    RecipeId,
    ResponsibleId,
    Notes,
    LastUpdated,
}

#[derive(DeriveIden)]
enum CultureEvents {
    Table,
    Id,
    CultureId,
    EventType,
    Date,
    Comment,
    UserId,
}

#[derive(DeriveIden)]
enum TaskComments {
    Table,
    Id,
    TaskId,
    UserId,
    Text,
    Date,
}

#[derive(DeriveIden)]
enum CalendarEvents {
    Table,
    Id,
    Subject,
    Description,
    StartDatetime,
    EndDatetime,
    OrganizerId,
    Location,
}

#[derive(DeriveIden)]
enum CalendarEventParticipants {
    Table,
    EventId,
    UserId,
}

#[derive(DeriveIden)]
enum DocumentTemplates {
    Table,
    Id,
    Name,
    Description,
    FileUrl,
    UploadedById,
    UploadedAt,
}
