use std::collections::HashMap;

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::error::Error;
use crate::event::EventType;

use super::{CampaignMetrics, EventCounts};

/// Builds the per-campaign summary table: one aggregate query over events,
/// left-joined in memory against every campaign so that campaigns without
/// events still appear with zeroed counts.
#[tracing::instrument(skip(db))]
pub async fn get_campaign_metrics(db: &dyn Database) -> Result<Vec<CampaignMetrics>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;
    let counts = collect_counts(db).await?;

    Ok(campaigns
        .into_iter()
        .map(|campaign| {
            let counts = counts.get(&campaign.id).copied().unwrap_or_default();
            summarize(campaign, counts)
        })
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get_metrics_for_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<CampaignMetrics, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    let counts = collect_counts(db).await?;
    let counts = counts.get(&campaign_id).copied().unwrap_or_default();

    Ok(summarize(campaign, counts))
}

async fn collect_counts(
    db: &dyn Database,
) -> Result<HashMap<CampaignId, EventCounts>, Error> {
    let mut by_campaign: HashMap<CampaignId, EventCounts> = HashMap::new();

    for row in db.events().count_events_by_type().await? {
        let counts = by_campaign.entry(row.campaign_id).or_default();
        match row.event_type {
            EventType::Open => counts.open = row.count,
            EventType::Click => counts.click = row.count,
            EventType::Submitted => counts.submitted = row.count,
            EventType::Reported => counts.reported = row.count,
            EventType::DownloadedAttachment => counts.downloaded = row.count,
        }
    }

    Ok(by_campaign)
}

fn summarize(campaign: crate::campaign::Campaign, counts: EventCounts) -> CampaignMetrics {
    let target_count = campaign.target_count;

    CampaignMetrics {
        campaign_id: campaign.id,
        name: campaign.name,
        status: campaign.status,
        created_at: campaign.created_at,
        target_count,
        counts,
        open_rate: rate(counts.open, target_count),
        click_rate: rate(counts.click, target_count),
        submitted_rate: rate(counts.submitted, target_count),
        report_rate: rate(counts.reported, target_count),
        download_rate: rate(counts.downloaded, target_count),
    }
}

/// Percentage of targets that produced the event, rounded to 2 decimals.
/// Repeated interactions can push the raw ratio past 100, so the result is
/// capped; a zero target count yields 0 rather than dividing by it.
fn rate(count: u64, target_count: i64) -> f64 {
    if target_count <= 0 {
        return 0.0;
    }

    let raw = count as f64 / target_count as f64 * 100.0;
    ((raw * 100.0).round() / 100.0).min(100.0)
}
