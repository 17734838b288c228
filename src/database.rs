use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection, Schema};
use tracing::info;

use crate::campaign::db::CampaignStore;
use crate::employee::db::EmployeeStore;
use crate::entities;
use crate::error::Error;
use crate::event::db::EventStore;

pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
    fn employees(&self) -> &dyn EmployeeStore;
    fn events(&self) -> &dyn EventStore;
}

#[derive(Clone, Debug)]
pub struct SeaOrmDatabase {
    conn: DatabaseConnection,
}

impl SeaOrmDatabase {
    pub async fn connect(url: &str) -> Result<SeaOrmDatabase, Error> {
        let mut options = ConnectOptions::new(url.to_owned());
        options.sqlx_logging(false);
        if url.contains(":memory:") {
            // An in-memory sqlite database lives and dies with its
            // connection; the pool must hold exactly one so every handle
            // sees the same tables.
            options.max_connections(1).min_connections(1);
        }

        let conn = sea_orm::Database::connect(options).await?;
        let db = SeaOrmDatabase { conn };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Creates any missing tables from the entity definitions, including
    /// the foreign keys from events to campaigns and employees and the
    /// unique index on employee emails.
    async fn ensure_schema(&self) -> Result<(), Error> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let statements = vec![
            schema.create_table_from_entity(entities::CampaignEntity),
            schema.create_table_from_entity(entities::EmployeeEntity),
            schema.create_table_from_entity(entities::EventEntity),
        ];

        for mut statement in statements {
            statement.if_not_exists();
            self.conn.execute(backend.build(&statement)).await?;
        }

        info!("database schema is up to date");
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

impl Database for SeaOrmDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        self
    }

    fn employees(&self) -> &dyn EmployeeStore {
        self
    }

    fn events(&self) -> &dyn EventStore {
        self
    }
}

#[cfg(test)]
pub mod test {
    use async_trait::async_trait;

    use crate::campaign::db::CampaignStore;
    use crate::campaign::{Campaign, CampaignDraft, CampaignId, CampaignStatus};
    use crate::employee::db::EmployeeStore;
    use crate::employee::{Employee, EmployeeDraft, EmployeeId};
    use crate::error::Error;
    use crate::event::db::{EventStore, EventTypeCount, RecordedEvent};
    use crate::event::{Event, EventDraft};

    use super::Database;

    pub struct MockCampaignStore {
        pub on_insert_campaign:
            Box<dyn Fn(&CampaignDraft) -> Result<Campaign, Error> + Send + Sync>,
        pub on_fetch_campaigns: Box<dyn Fn() -> Result<Vec<Campaign>, Error> + Send + Sync>,
        pub on_fetch_campaign_by_id:
            Box<dyn Fn(CampaignId) -> Result<Option<Campaign>, Error> + Send + Sync>,
        pub on_update_campaign_status: Box<
            dyn Fn(CampaignId, CampaignStatus) -> Result<Option<Campaign>, Error> + Send + Sync,
        >,
    }

    impl MockCampaignStore {
        pub fn new() -> MockCampaignStore {
            MockCampaignStore {
                on_insert_campaign: Box::new(|_| panic!("insert_campaign was not mocked")),
                on_fetch_campaigns: Box::new(|| panic!("fetch_campaigns was not mocked")),
                on_fetch_campaign_by_id: Box::new(|_| {
                    panic!("fetch_campaign_by_id was not mocked")
                }),
                on_update_campaign_status: Box::new(|_, _| {
                    panic!("update_campaign_status was not mocked")
                }),
            }
        }
    }

    #[async_trait]
    impl CampaignStore for MockCampaignStore {
        async fn insert_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, Error> {
            (self.on_insert_campaign)(draft)
        }

        async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
            (self.on_fetch_campaigns)()
        }

        async fn fetch_campaign_by_id(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_fetch_campaign_by_id)(campaign_id)
        }

        async fn update_campaign_status(
            &self,
            campaign_id: CampaignId,
            status: CampaignStatus,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_update_campaign_status)(campaign_id, status)
        }
    }

    pub struct MockEmployeeStore {
        pub on_insert_employee:
            Box<dyn Fn(&EmployeeDraft) -> Result<Employee, Error> + Send + Sync>,
        pub on_fetch_employees: Box<dyn Fn() -> Result<Vec<Employee>, Error> + Send + Sync>,
        pub on_fetch_employee_by_email:
            Box<dyn Fn(&str) -> Result<Option<Employee>, Error> + Send + Sync>,
        pub on_fetch_employee_by_id:
            Box<dyn Fn(EmployeeId) -> Result<Option<Employee>, Error> + Send + Sync>,
    }

    impl MockEmployeeStore {
        pub fn new() -> MockEmployeeStore {
            MockEmployeeStore {
                on_insert_employee: Box::new(|_| panic!("insert_employee was not mocked")),
                on_fetch_employees: Box::new(|| panic!("fetch_employees was not mocked")),
                on_fetch_employee_by_email: Box::new(|_| {
                    panic!("fetch_employee_by_email was not mocked")
                }),
                on_fetch_employee_by_id: Box::new(|_| {
                    panic!("fetch_employee_by_id was not mocked")
                }),
            }
        }
    }

    #[async_trait]
    impl EmployeeStore for MockEmployeeStore {
        async fn insert_employee(&self, draft: &EmployeeDraft) -> Result<Employee, Error> {
            (self.on_insert_employee)(draft)
        }

        async fn fetch_employees(&self) -> Result<Vec<Employee>, Error> {
            (self.on_fetch_employees)()
        }

        async fn fetch_employee_by_email(&self, email: &str) -> Result<Option<Employee>, Error> {
            (self.on_fetch_employee_by_email)(email)
        }

        async fn fetch_employee_by_id(
            &self,
            employee_id: EmployeeId,
        ) -> Result<Option<Employee>, Error> {
            (self.on_fetch_employee_by_id)(employee_id)
        }
    }

    pub struct MockEventStore {
        pub on_insert_event: Box<dyn Fn(&EventDraft) -> Result<Event, Error> + Send + Sync>,
        pub on_fetch_events: Box<
            dyn Fn(Option<CampaignId>, Option<EmployeeId>) -> Result<Vec<RecordedEvent>, Error>
                + Send
                + Sync,
        >,
        pub on_count_events_by_type:
            Box<dyn Fn() -> Result<Vec<EventTypeCount>, Error> + Send + Sync>,
    }

    impl MockEventStore {
        pub fn new() -> MockEventStore {
            MockEventStore {
                on_insert_event: Box::new(|_| panic!("insert_event was not mocked")),
                on_fetch_events: Box::new(|_, _| panic!("fetch_events was not mocked")),
                on_count_events_by_type: Box::new(|| {
                    panic!("count_events_by_type was not mocked")
                }),
            }
        }
    }

    #[async_trait]
    impl EventStore for MockEventStore {
        async fn insert_event(&self, draft: &EventDraft) -> Result<Event, Error> {
            (self.on_insert_event)(draft)
        }

        async fn fetch_events(
            &self,
            campaign_id: Option<CampaignId>,
            employee_id: Option<EmployeeId>,
        ) -> Result<Vec<RecordedEvent>, Error> {
            (self.on_fetch_events)(campaign_id, employee_id)
        }

        async fn count_events_by_type(&self) -> Result<Vec<EventTypeCount>, Error> {
            (self.on_count_events_by_type)()
        }
    }

    pub struct MockDatabase {
        pub campaigns: MockCampaignStore,
        pub employees: MockEmployeeStore,
        pub events: MockEventStore,
    }

    impl MockDatabase {
        pub fn new() -> MockDatabase {
            MockDatabase {
                campaigns: MockCampaignStore::new(),
                employees: MockEmployeeStore::new(),
                events: MockEventStore::new(),
            }
        }
    }

    impl Database for MockDatabase {
        fn campaigns(&self) -> &dyn CampaignStore {
            &self.campaigns
        }

        fn employees(&self) -> &dyn EmployeeStore {
            &self.employees
        }

        fn events(&self) -> &dyn EventStore {
            &self.events
        }
    }
}
