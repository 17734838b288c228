use crate::campaign::CampaignId;
use crate::database::Database;
use crate::employee::EmployeeId;
use crate::error::Error;

use super::db::RecordedEvent;
use super::{Event, EventDraft, EventType};

/// Records a tracked interaction. Every event type goes through the same
/// checks: the campaign must exist and the email must belong to a known
/// employee; the stored row carries the employee's id regardless of what
/// the tracking link claimed.
#[tracing::instrument(skip(db))]
pub async fn record_event(
    db: &dyn Database,
    campaign_id: CampaignId,
    email: &str,
    event_type: EventType,
    ip: &str,
) -> Result<Event, Error> {
    db.campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    let employee = db
        .employees()
        .fetch_employee_by_email(email)
        .await?
        .ok_or_else(|| Error::EmployeeNotFoundByEmail {
            email: email.to_owned(),
        })?;

    db.events()
        .insert_event(&EventDraft {
            campaign_id,
            employee_id: employee.id,
            email: employee.email,
            ip: ip.to_owned(),
            event_type,
        })
        .await
}

/// Lists recorded events, optionally filtered. An employee filter for an
/// id that does not exist is rejected rather than silently matching
/// nothing.
#[tracing::instrument(skip(db))]
pub async fn get_events(
    db: &dyn Database,
    campaign_id: Option<CampaignId>,
    employee_id: Option<EmployeeId>,
) -> Result<Vec<RecordedEvent>, Error> {
    if let Some(employee_id) = employee_id {
        db.employees()
            .fetch_employee_by_id(employee_id)
            .await?
            .ok_or(Error::EmployeeNotFound { employee_id })?;
    }

    db.events().fetch_events(campaign_id, employee_id).await
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::campaign::{Campaign, CampaignStatus};
    use crate::database::test::MockDatabase;
    use crate::employee::Employee;
    use crate::event::EventId;

    use super::*;

    fn sample_campaign(id: i64) -> Campaign {
        Campaign {
            id: CampaignId::from_raw(id),
            name: "Payroll Update".to_owned(),
            description: String::new(),
            status: CampaignStatus::Running,
            created_at: Utc::now(),
            target_count: 10,
        }
    }

    fn sample_employee(id: i64, email: &str) -> Employee {
        Employee {
            id: EmployeeId::from_raw(id),
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            email: email.to_owned(),
            business_unit: "Engineering".to_owned(),
            team_name: "Systems".to_owned(),
            score: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_event_for_known_campaign_and_employee() {
        let mut db = MockDatabase::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(|id| Ok(Some(sample_campaign(id.value()))));
        db.employees.on_fetch_employee_by_email =
            Box::new(|email| Ok(Some(sample_employee(7, email))));
        db.events.on_insert_event = Box::new(|draft| {
            assert_eq!(draft.event_type, EventType::Click);
            assert_eq!(draft.employee_id, EmployeeId::from_raw(7));
            Ok(Event {
                id: EventId::from_raw(1),
                campaign_id: draft.campaign_id,
                employee_id: draft.employee_id,
                email: draft.email.clone(),
                ip: draft.ip.clone(),
                event_type: draft.event_type,
                timestamp: Utc::now(),
            })
        });

        let event = record_event(
            &db,
            CampaignId::from_raw(3),
            "grace.hopper@example.com",
            EventType::Click,
            "10.0.0.1",
        )
        .await
        .unwrap();

        assert_eq!(event.campaign_id, CampaignId::from_raw(3));
        assert_eq!(event.ip, "10.0.0.1");
    }

    #[tokio::test]
    async fn unknown_campaign_is_rejected_before_insert() {
        let mut db = MockDatabase::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(|_| Ok(None));

        let result = record_event(
            &db,
            CampaignId::from_raw(99),
            "grace.hopper@example.com",
            EventType::Open,
            "10.0.0.1",
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: CampaignId::from_raw(99)
            }
        );
    }

    #[tokio::test]
    async fn listing_with_an_unknown_employee_filter_is_rejected() {
        let mut db = MockDatabase::new();
        db.employees.on_fetch_employee_by_id = Box::new(|_| Ok(None));

        let result = get_events(&db, None, Some(EmployeeId::from_raw(404))).await;

        assert_eq!(
            result.unwrap_err(),
            Error::EmployeeNotFound {
                employee_id: EmployeeId::from_raw(404)
            }
        );
    }

    #[tokio::test]
    async fn listing_with_a_known_employee_filter_passes_through() {
        let mut db = MockDatabase::new();
        db.employees.on_fetch_employee_by_id =
            Box::new(|id| Ok(Some(sample_employee(id.value(), "grace.hopper@example.com"))));
        db.events.on_fetch_events = Box::new(|campaign_id, employee_id| {
            assert_eq!(campaign_id, None);
            assert_eq!(employee_id, Some(EmployeeId::from_raw(7)));
            Ok(vec![])
        });

        let events = get_events(&db, None, Some(EmployeeId::from_raw(7)))
            .await
            .unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_before_insert() {
        let mut db = MockDatabase::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(|id| Ok(Some(sample_campaign(id.value()))));
        db.employees.on_fetch_employee_by_email = Box::new(|_| Ok(None));

        let result = record_event(
            &db,
            CampaignId::from_raw(3),
            "nobody@example.com",
            EventType::Reported,
            "10.0.0.1",
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::EmployeeNotFoundByEmail {
                email: "nobody@example.com".to_owned()
            }
        );
    }
}
