use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::campaign::CampaignId;
use crate::database::SeaOrmDatabase;
use crate::employee::EmployeeId;
use crate::entities::{campaign, event};
use crate::error::Error;

use super::{Event, EventDraft, EventId, EventType};

/// An event joined with the owning campaign's name, the shape the
/// dashboard's event listing wants.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub event: Event,
    pub campaign_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventTypeCount {
    pub campaign_id: CampaignId,
    pub event_type: EventType,
    pub count: u64,
}

#[derive(Debug, FromQueryResult)]
struct EventCountRow {
    campaign_id: i64,
    event_type: String,
    count: i64,
}

#[async_trait]
pub trait EventStore {
    async fn insert_event(&self, draft: &EventDraft) -> Result<Event, Error>;

    async fn fetch_events(
        &self,
        campaign_id: Option<CampaignId>,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<RecordedEvent>, Error>;

    async fn count_events_by_type(&self) -> Result<Vec<EventTypeCount>, Error>;
}

#[async_trait]
impl EventStore for SeaOrmDatabase {
    #[tracing::instrument(skip(self))]
    async fn insert_event(&self, draft: &EventDraft) -> Result<Event, Error> {
        let model = event::ActiveModel {
            campaign_id: Set(draft.campaign_id.value()),
            employee_id: Set(draft.employee_id.value()),
            email: Set(draft.email.clone()),
            ip: Set(draft.ip.clone()),
            event_type: Set(draft.event_type.as_str().to_owned()),
            timestamp: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.connection())
        .await?;

        from_model(model)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_events(
        &self,
        campaign_id: Option<CampaignId>,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<RecordedEvent>, Error> {
        let mut query = event::Entity::find().find_also_related(campaign::Entity);

        if let Some(campaign_id) = campaign_id {
            query = query.filter(event::Column::CampaignId.eq(campaign_id.value()));
        }
        if let Some(employee_id) = employee_id {
            query = query.filter(event::Column::EmployeeId.eq(employee_id.value()));
        }

        let rows = query
            .order_by_asc(event::Column::Id)
            .all(self.connection())
            .await?;

        rows.into_iter()
            .map(|(model, campaign)| {
                let campaign = campaign.ok_or_else(|| {
                    Error::ExistentialState(format!(
                        "event {} references a missing campaign",
                        model.id
                    ))
                })?;
                Ok(RecordedEvent {
                    event: from_model(model)?,
                    campaign_name: campaign.name,
                })
            })
            .collect()
    }

    /// One aggregate query over the whole events table, grouped by
    /// (campaign, type); campaigns and types with no rows are absent and
    /// get zero-filled by the aggregator.
    #[tracing::instrument(skip(self))]
    async fn count_events_by_type(&self) -> Result<Vec<EventTypeCount>, Error> {
        let rows = event::Entity::find()
            .select_only()
            .column(event::Column::CampaignId)
            .column(event::Column::EventType)
            .column_as(event::Column::Id.count(), "count")
            .group_by(event::Column::CampaignId)
            .group_by(event::Column::EventType)
            .into_model::<EventCountRow>()
            .all(self.connection())
            .await?;

        rows.into_iter()
            .map(|row| {
                let event_type = EventType::parse(&row.event_type).ok_or_else(|| {
                    Error::ExistentialState(format!(
                        "events table holds unknown event type '{}'",
                        row.event_type
                    ))
                })?;
                Ok(EventTypeCount {
                    campaign_id: CampaignId::from_raw(row.campaign_id),
                    event_type,
                    count: row.count as u64,
                })
            })
            .collect()
    }
}

fn from_model(model: event::Model) -> Result<Event, Error> {
    let event_type = EventType::parse(&model.event_type).ok_or_else(|| {
        Error::ExistentialState(format!(
            "event {} has unknown type '{}'",
            model.id, model.event_type
        ))
    })?;

    Ok(Event {
        id: EventId::from_raw(model.id),
        campaign_id: CampaignId::from_raw(model.campaign_id),
        employee_id: EmployeeId::from_raw(model.employee_id),
        email: model.email,
        ip: model.ip,
        event_type,
        timestamp: model.timestamp,
    })
}
