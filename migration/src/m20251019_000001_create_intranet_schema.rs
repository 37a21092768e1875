use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Primary key column, with a server-side default on Postgres.
pub(crate) fn id_column<T: IntoIden>(backend: sea_orm::DatabaseBackend, iden: T) -> Result<ColumnDef, DbErr> {
    let mut column = ColumnDef::new(iden);
    column.uuid().not_null().primary_key();
    match backend {
        sea_orm::DatabaseBackend::Postgres => {
            column.default(Expr::cust("gen_random_uuid()"));
        }
        sea_orm::DatabaseBackend::Sqlite => {}
        _ => {
            return Err(DbErr::Custom("Unsupported database backend".to_string()));
        }
    }
    Ok(column)
}

pub(crate) fn timestamp_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // Users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, Users::Id)?)
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(254))
                    .col(ColumnDef::new(Users::FirstName).string_len(150))
                    .col(ColumnDef::new(Users::LastName).string_len(150))
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("employee"),
                    )
                    .col(ColumnDef::new(Users::ProfileUrl).text())
                    .col(&mut timestamp_column(Users::CreatedAt))
                    .col(&mut timestamp_column(Users::LastUpdated))
                    .to_owned(),
            )
            .await?;

        // Reagents
        manager
            .create_table(
                Table::create()
                    .table(Reagents::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, Reagents::Id)?)
                    .col(ColumnDef::new(Reagents::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Reagents::Category).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Reagents::OnHand)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reagents::MinThreshold)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Reagents::MinThreshold).gte(0)),
                    )
                    .col(ColumnDef::new(Reagents::ExpiryDate).date())
                    .col(ColumnDef::new(Reagents::ExternalLink).text())
                    .col(&mut timestamp_column(Reagents::CreatedAt))
                    .col(&mut timestamp_column(Reagents::LastUpdated))
                    .to_owned(),
            )
            .await?;

        // Reagent movements: append-only, owned by their reagent
        manager
            .create_table(
                Table::create()
                    .table(ReagentMovements::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, ReagentMovements::Id)?)
                    .col(ColumnDef::new(ReagentMovements::ReagentId).uuid().not_null())
                    .col(
                        ColumnDef::new(ReagentMovements::Quantity)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(ReagentMovements::Quantity).gt(0)),
                    )
                    .col(
                        ColumnDef::new(ReagentMovements::MovementType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(&mut timestamp_column(ReagentMovements::Date))
                    .col(
                        ColumnDef::new(ReagentMovements::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ReagentMovements::UserId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reagent_movements_reagent_id")
                            .from(ReagentMovements::Table, ReagentMovements::ReagentId)
                            .to(Reagents::Table, Reagents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reagent_movements_user_id")
                            .from(ReagentMovements::Table, ReagentMovements::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Tasks
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, Tasks::Id)?)
                    .col(ColumnDef::new(Tasks::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Tasks::Description).text().not_null())
                    .col(ColumnDef::new(Tasks::AssigneeId).uuid())
                    .col(ColumnDef::new(Tasks::CreatorId).uuid())
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string_len(20)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .string_len(20)
                            .not_null()
                            .default("normal"),
                    )
                    .col(ColumnDef::new(Tasks::Deadline).timestamp_with_time_zone())
                    .col(&mut timestamp_column(Tasks::CreatedAt))
                    .col(&mut timestamp_column(Tasks::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_assignee_id")
                            .from(Tasks::Table, Tasks::AssigneeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_creator_id")
                            .from(Tasks::Table, Tasks::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Announcements
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(&mut id_column(backend, Announcements::Id)?)
                    .col(ColumnDef::new(Announcements::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Announcements::Text).text().not_null())
                    .col(ColumnDef::new(Announcements::AuthorId).uuid())
                    .col(&mut timestamp_column(Announcements::PublishedAt))
                    .col(
                        ColumnDef::new(Announcements::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcements_author_id")
                            .from(Announcements::Table, Announcements::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReagentMovements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reagents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Role,
    ProfileUrl,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
pub(crate) enum Reagents {
    Table,
    Id,
    Name,
    Category,
    OnHand,
    MinThreshold,
    ExpiryDate,
    ExternalLink,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
pub(crate) enum ReagentMovements {
    Table,
    Id,
    ReagentId,
    Quantity,
    MovementType,
    Date,
    Comment,
    UserId,
}

#[derive(DeriveIden)]
pub(crate) enum Tasks {
    Table,
    Id,
    Title,
    Description,
    AssigneeId,
    CreatorId,
    Status,
    Priority,
    Deadline,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
pub(crate) enum Announcements {
    Table,
    Id,
    Title,
    Text,
    AuthorId,
    PublishedAt,
    IsPinned,
}
