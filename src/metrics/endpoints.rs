use actix_web::get;
use actix_web::web::{Data, Json, Path};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::campaign::{CampaignId, CampaignStatus};
use crate::database::Database;
use crate::error::Error;

use super::{manager, CampaignMetrics, EventCounts};

#[derive(Clone, Debug, Serialize)]
pub struct CampaignMetricsBody {
    pub campaign_id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub target_count: i64,
    pub counts: EventCounts,
    pub open_rate: f64,
    pub click_rate: f64,
    pub submitted_rate: f64,
    pub report_rate: f64,
    pub download_rate: f64,
}

impl CampaignMetricsBody {
    pub fn render(metrics: CampaignMetrics) -> CampaignMetricsBody {
        CampaignMetricsBody {
            campaign_id: metrics.campaign_id,
            name: metrics.name,
            status: metrics.status,
            created_at: metrics.created_at,
            target_count: metrics.target_count,
            counts: metrics.counts,
            open_rate: metrics.open_rate,
            click_rate: metrics.click_rate,
            submitted_rate: metrics.submitted_rate,
            report_rate: metrics.report_rate,
            download_rate: metrics.download_rate,
        }
    }
}

#[get("/metrics")]
#[tracing::instrument(skip(db))]
async fn get_metrics(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Vec<CampaignMetricsBody>>, Error> {
    let metrics = manager::get_campaign_metrics(db.get_ref().as_ref()).await?;

    Ok(Json(
        metrics.into_iter().map(CampaignMetricsBody::render).collect(),
    ))
}

#[get("/metrics/{campaign_id}")]
#[tracing::instrument(skip(db))]
async fn get_metrics_for_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignMetricsBody>, Error> {
    let campaign_id = params.into_inner();

    let metrics = manager::get_metrics_for_campaign(db.get_ref().as_ref(), campaign_id).await?;

    Ok(Json(CampaignMetricsBody::render(metrics)))
}
