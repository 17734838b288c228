use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::database::SeaOrmDatabase;
use crate::entities::campaign;
use crate::error::Error;

use super::{Campaign, CampaignDraft, CampaignId, CampaignStatus};

#[async_trait]
pub trait CampaignStore {
    async fn insert_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, Error>;

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<Option<Campaign>, Error>;
}

#[async_trait]
impl CampaignStore for SeaOrmDatabase {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, Error> {
        let model = campaign::ActiveModel {
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            status: Set(CampaignStatus::Running.as_str().to_owned()),
            created_at: Set(Utc::now()),
            target_count: Set(draft.target_count),
            ..Default::default()
        }
        .insert(self.connection())
        .await?;

        from_model(model)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let models = campaign::Entity::find()
            .order_by_asc(campaign::Column::Id)
            .all(self.connection())
            .await?;

        models.into_iter().map(from_model).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let model = campaign::Entity::find_by_id(campaign_id.value())
            .one(self.connection())
            .await?;

        model.map(from_model).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<Option<Campaign>, Error> {
        let model = campaign::Entity::find_by_id(campaign_id.value())
            .one(self.connection())
            .await?;

        let model = match model {
            Some(model) => model,
            None => return Ok(None),
        };

        let mut active: campaign::ActiveModel = model.into();
        active.status = Set(status.as_str().to_owned());
        let updated = active.update(self.connection()).await?;

        from_model(updated).map(Some)
    }
}

fn from_model(model: campaign::Model) -> Result<Campaign, Error> {
    let status = CampaignStatus::parse(&model.status).ok_or_else(|| {
        Error::ExistentialState(format!(
            "campaign {} has unknown status '{}'",
            model.id, model.status
        ))
    })?;

    Ok(Campaign {
        id: CampaignId::from_raw(model.id),
        name: model.name,
        description: model.description,
        status,
        created_at: model.created_at,
        target_count: model.target_count,
    })
}
