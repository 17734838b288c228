use crate::database::Database;
use crate::error::Error;

use super::{Campaign, CampaignDraft, CampaignId, CampaignStatus};

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    name: String,
    description: String,
    target_count: i64,
) -> Result<Campaign, Error> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(Error::CampaignNameMissing);
    }

    let draft = CampaignDraft {
        name,
        description,
        target_count,
    };

    db.campaigns().insert_campaign(&draft).await
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    db.campaigns().fetch_campaigns().await
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    db.campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })
}

#[tracing::instrument(skip(db))]
pub async fn set_campaign_status(
    db: &dyn Database,
    campaign_id: CampaignId,
    status: CampaignStatus,
) -> Result<Campaign, Error> {
    db.campaigns()
        .update_campaign_status(campaign_id, status)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })
}
