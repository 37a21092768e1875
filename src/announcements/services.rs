use super::models::{AnnouncementList, Column, Entity};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::icontains;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// The announcement feed: pinned first, then newest.
pub async fn feed(
    db: &DatabaseConnection,
    limit: u64,
    offset: u64,
) -> BusinessResult<Vec<AnnouncementList>> {
    let models = Entity::find()
        .order_by_desc(Column::IsPinned)
        .order_by_desc(Column::PublishedAt)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("announcement"))?;

    Ok(models.into_iter().map(AnnouncementList::from).collect())
}

pub async fn pinned(db: &DatabaseConnection) -> BusinessResult<Vec<AnnouncementList>> {
    let models = Entity::find()
        .filter(Column::IsPinned.eq(true))
        .order_by_desc(Column::PublishedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("announcement"))?;

    Ok(models.into_iter().map(AnnouncementList::from).collect())
}

/// Announcements whose title or text contains `needle`, ignoring case.
pub async fn matching_count(db: &DatabaseConnection, needle: &str) -> BusinessResult<u64> {
    Entity::find()
        .filter(
            Condition::any()
                .add(icontains(Column::Title, needle))
                .add(icontains(Column::Text, needle)),
        )
        .count(db)
        .await
        .map_err(|e| e.to_business_error("announcement"))
}
