use super::models::{
    ActiveModel, CalendarEvent, CalendarEventCreate, CalendarEventList, CalendarEventUpdate,
    CalendarQuery, Column, Entity, Model,
};
use super::participants;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::{PageParams, ensure_exists, ensure_user};
use crate::users::models as users;
use chrono::{DateTime, Days, NaiveTime, Utc};
use crudcrate::traits::MergeIntoActiveModel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Query,
};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

const RESOURCE: &str = "calendar_event";

fn validate_subject(subject: &str) -> BusinessResult<()> {
    if subject.trim().is_empty() {
        return Err(crate::validation_error!("subject", "must not be empty"));
    }
    Ok(())
}

fn validate_window(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> BusinessResult<()> {
    if end.is_some_and(|end| end < start) {
        return Err(crate::validation_error!(
            "end_datetime",
            "must not be before start_datetime"
        ));
    }
    Ok(())
}

/// Participant ids per event, each list sorted.
async fn participants_of<C: ConnectionTrait>(
    db: &C,
    event_ids: &[Uuid],
) -> BusinessResult<HashMap<Uuid, Vec<Uuid>>> {
    let rows = participants::Entity::find()
        .filter(participants::Column::EventId.is_in(event_ids.iter().copied()))
        .order_by_asc(participants::Column::UserId)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let mut by_event: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        by_event.entry(row.event_id).or_default().push(row.user_id);
    }
    Ok(by_event)
}

async fn with_participants<C: ConnectionTrait>(
    db: &C,
    model: Model,
) -> BusinessResult<CalendarEvent> {
    let mut participants = participants_of(db, &[model.id]).await?;
    let participant_ids = participants.remove(&model.id).unwrap_or_default();
    let mut event: CalendarEvent = model.into();
    event.participant_ids = participant_ids;
    Ok(event)
}

/// Replaces the participants of `event_id`. Every user must exist; duplicates collapse.
async fn replace_participants<C: ConnectionTrait>(
    txn: &C,
    event_id: Uuid,
    user_ids: &[Uuid],
) -> BusinessResult<()> {
    let user_ids: BTreeSet<Uuid> = user_ids.iter().copied().collect();
    for user_id in &user_ids {
        ensure_exists::<users::Entity, C>(txn, *user_id, "user").await?;
    }

    participants::Entity::delete_many()
        .filter(participants::Column::EventId.eq(event_id))
        .exec(txn)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    if user_ids.is_empty() {
        return Ok(());
    }

    participants::Entity::insert_many(user_ids.into_iter().map(|user_id| {
        participants::ActiveModel {
            event_id: Set(event_id),
            user_id: Set(user_id),
        }
    }))
    .exec_without_returning(txn)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(())
}

async fn find_model(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Model> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))
}

pub async fn get_event(db: &DatabaseConnection, id: Uuid) -> BusinessResult<CalendarEvent> {
    let model = find_model(db, id).await?;
    with_participants(db, model).await
}

/// Inserts the event and its participants in one transaction.
pub async fn create_event(
    db: &DatabaseConnection,
    create_data: CalendarEventCreate,
) -> BusinessResult<CalendarEvent> {
    validate_subject(&create_data.subject)?;
    validate_window(create_data.start_datetime, create_data.end_datetime)?;
    ensure_user(db, create_data.organizer_id).await?;

    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        subject: Set(create_data.subject),
        description: Set(create_data.description.unwrap_or_default()),
        start_datetime: Set(create_data.start_datetime),
        end_datetime: Set(create_data.end_datetime),
        organizer_id: Set(create_data.organizer_id),
        location: Set(create_data.location.unwrap_or_default()),
    }
    .insert(&txn)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    replace_participants(&txn, inserted.id, &create_data.participant_ids).await?;
    let event = with_participants(&txn, inserted).await?;

    txn.commit()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(
        event_id = %event.id,
        participants = event.participant_ids.len(),
        "Created calendar event"
    );

    Ok(event)
}

pub async fn update_event(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: CalendarEventUpdate,
) -> BusinessResult<CalendarEvent> {
    if let Some(Some(subject)) = &update_data.subject {
        validate_subject(subject)?;
    }
    if let Some(organizer_id) = update_data.organizer_id {
        ensure_user(db, organizer_id).await?;
    }

    let existing = find_model(db, id).await?;
    let start = match update_data.start_datetime {
        Some(Some(start)) => start,
        _ => existing.start_datetime,
    };
    let end = update_data.end_datetime.unwrap_or(existing.end_datetime);
    validate_window(start, end)?;

    let updated = update_data
        .merge_into_activemodel(existing.into_active_model())
        .map_err(|e| e.to_business_error(RESOURCE))?
        .update(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    with_participants(db, updated).await
}

pub async fn set_participants(
    db: &DatabaseConnection,
    id: Uuid,
    user_ids: &[Uuid],
) -> BusinessResult<CalendarEvent> {
    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let model = Entity::find_by_id(id)
        .one(&txn)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))?;
    replace_participants(&txn, id, user_ids).await?;
    let event = with_participants(&txn, model).await?;

    txn.commit()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(
        event_id = %id,
        participants = event.participant_ids.len(),
        "Replaced participants"
    );

    Ok(event)
}

fn list_condition(query: &CalendarQuery) -> Condition {
    let mut condition = Condition::all();
    if let Some(start_date) = query.start_date {
        let from = start_date.and_time(NaiveTime::MIN).and_utc();
        condition = condition.add(Column::StartDatetime.gte(from));
    }
    if let Some(end_date) = query.end_date {
        // The whole end day is included.
        if let Some(next_day) = end_date.checked_add_days(Days::new(1)) {
            let until = next_day.and_time(NaiveTime::MIN).and_utc();
            condition = condition.add(Column::StartDatetime.lt(until));
        }
    }
    if let Some(user_id) = query.user_id {
        condition = condition.add(
            Condition::any()
                .add(Column::OrganizerId.eq(user_id))
                .add(
                    Column::Id.in_subquery(
                        Query::select()
                            .column(participants::Column::EventId)
                            .from(participants::Entity)
                            .and_where(participants::Column::UserId.eq(user_id))
                            .to_owned(),
                    ),
                ),
        );
    }
    condition
}

/// Events in start order, narrowed by the calendar window and attendance filters.
pub async fn list_events(
    db: &DatabaseConnection,
    query: &CalendarQuery,
) -> BusinessResult<Vec<CalendarEventList>> {
    let page = PageParams {
        limit: query.limit,
        offset: query.offset,
    };
    let models = Entity::find()
        .filter(list_condition(query))
        .order_by_asc(Column::StartDatetime)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
    let mut participants = participants_of(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let participant_ids = participants.remove(&model.id).unwrap_or_default();
            let mut event = CalendarEventList::from(model);
            event.participant_ids = participant_ids;
            event
        })
        .collect())
}
