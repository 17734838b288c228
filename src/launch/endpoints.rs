use std::time::Duration;

use actix_web::post;
use actix_web::web::{Data, Json, Path};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::error::Error;

use super::manager::{self, LaunchOutcome};
use super::{LureGenerator, MailSender, Target};

/// The launch collaborators, shared across requests. One campaign launch
/// runs inside the request that started it.
pub struct LaunchContext {
    pub generator: Box<dyn LureGenerator>,
    pub mailer: Box<dyn MailSender>,
    pub base_url: String,
    pub send_delay: Duration,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LaunchCampaignBody {
    pub reason: String,
    pub link: String,
    pub targets: Vec<Target>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LaunchSummaryBody {
    pub status: String,
    pub campaign_id: CampaignId,
    pub sent: u64,
    pub failed: u64,
}

impl LaunchSummaryBody {
    pub fn render(outcome: LaunchOutcome) -> LaunchSummaryBody {
        LaunchSummaryBody {
            status: "success".to_owned(),
            campaign_id: outcome.campaign_id,
            sent: outcome.sent,
            failed: outcome.failed,
        }
    }
}

#[post("/campaigns/{campaign_id}/launch")]
#[tracing::instrument(skip(db, context, body))]
async fn launch_campaign(
    db: Data<Box<dyn Database>>,
    context: Data<LaunchContext>,
    params: Path<CampaignId>,
    body: Json<LaunchCampaignBody>,
) -> Result<Json<LaunchSummaryBody>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let outcome = manager::launch_campaign(
        db.get_ref().as_ref(),
        context.generator.as_ref(),
        context.mailer.as_ref(),
        &context.base_url,
        context.send_delay,
        campaign_id,
        body.reason,
        body.link,
        body.targets,
    )
    .await?;

    Ok(Json(LaunchSummaryBody::render(outcome)))
}
