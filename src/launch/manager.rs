use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::employee::{Employee, EmployeeDraft};
use crate::error::Error;

use super::{
    Lure, LureContext, LureGenerator, MailSender, OutgoingEmail, Target, TrackingLinks,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaunchOutcome {
    pub campaign_id: CampaignId,
    pub sent: u64,
    pub failed: u64,
}

/// Sends one generated lure per target, pacing sends with a fixed delay.
/// A failed generation or delivery is logged and skipped; the remaining
/// targets still get their emails. Target emails are validated up front,
/// the same rule the employee registry enforces, so nothing is sent when
/// the roster is malformed.
#[tracing::instrument(skip(db, generator, mailer, targets), fields(targets = targets.len()))]
pub async fn launch_campaign(
    db: &dyn Database,
    generator: &dyn LureGenerator,
    mailer: &dyn MailSender,
    base_url: &str,
    send_delay: Duration,
    campaign_id: CampaignId,
    reason: String,
    link: String,
    targets: Vec<Target>,
) -> Result<LaunchOutcome, Error> {
    db.campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    let targets = targets
        .into_iter()
        .map(|target| {
            let email = target.email.trim().to_owned();
            if email.is_empty() {
                return Err(Error::EmployeeEmailMissing);
            }
            Ok(Target { email, ..target })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let mut sent = 0;
    let mut failed = 0;

    for (index, target) in targets.into_iter().enumerate() {
        if index > 0 && !send_delay.is_zero() {
            tokio::time::sleep(send_delay).await;
        }

        let employee = ensure_employee(db, &target).await?;

        match send_one(generator, mailer, base_url, campaign_id, &reason, &link, target).await {
            Ok(()) => sent += 1,
            Err(err) => {
                warn!(
                    email = %employee.email,
                    error = %err,
                    "skipping target after upstream failure"
                );
                failed += 1;
            }
        }
    }

    info!(%campaign_id, sent, failed, "campaign launch finished");

    Ok(LaunchOutcome {
        campaign_id,
        sent,
        failed,
    })
}

/// Targets not yet on the employee roster are added the first time they
/// appear in a launch.
async fn ensure_employee(db: &dyn Database, target: &Target) -> Result<Employee, Error> {
    if let Some(employee) = db.employees().fetch_employee_by_email(&target.email).await? {
        return Ok(employee);
    }

    db.employees()
        .insert_employee(&EmployeeDraft {
            email: target.email.clone(),
            first_name: target.first_name.clone(),
            last_name: target.last_name.clone(),
            business_unit: target.business_unit.clone(),
            team_name: target.team_name.clone(),
            score: 0,
        })
        .await
}

async fn send_one(
    generator: &dyn LureGenerator,
    mailer: &dyn MailSender,
    base_url: &str,
    campaign_id: CampaignId,
    reason: &str,
    link: &str,
    target: Target,
) -> Result<(), Error> {
    let tracking = TrackingLinks::build(base_url, campaign_id, &target.email);
    let to = target.email.clone();

    let context = LureContext {
        target,
        reason: reason.to_owned(),
        link: link.to_owned(),
        tracking,
    };

    let Lure {
        subject,
        body_text,
        body_html,
    } = generator.generate_lure(&context).await?;

    mailer
        .send(&OutgoingEmail {
            to,
            subject,
            body_text,
            body_html,
        })
        .await
}
