use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::database::SeaOrmDatabase;
use crate::entities::employee;
use crate::error::Error;

use super::{Employee, EmployeeDraft, EmployeeId};

#[async_trait]
pub trait EmployeeStore {
    async fn insert_employee(&self, draft: &EmployeeDraft) -> Result<Employee, Error>;

    async fn fetch_employees(&self) -> Result<Vec<Employee>, Error>;

    async fn fetch_employee_by_email(&self, email: &str) -> Result<Option<Employee>, Error>;

    async fn fetch_employee_by_id(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<Employee>, Error>;
}

#[async_trait]
impl EmployeeStore for SeaOrmDatabase {
    #[tracing::instrument(skip(self))]
    async fn insert_employee(&self, draft: &EmployeeDraft) -> Result<Employee, Error> {
        let model = employee::ActiveModel {
            first_name: Set(draft.first_name.clone()),
            last_name: Set(draft.last_name.clone()),
            email: Set(draft.email.clone()),
            business_unit: Set(draft.business_unit.clone()),
            team_name: Set(draft.team_name.clone()),
            score: Set(draft.score),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.connection())
        .await?;

        Ok(from_model(model))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_employees(&self) -> Result<Vec<Employee>, Error> {
        let models = employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(self.connection())
            .await?;

        Ok(models.into_iter().map(from_model).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_employee_by_email(&self, email: &str) -> Result<Option<Employee>, Error> {
        let model = employee::Entity::find()
            .filter(employee::Column::Email.eq(email))
            .one(self.connection())
            .await?;

        Ok(model.map(from_model))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_employee_by_id(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<Employee>, Error> {
        let model = employee::Entity::find_by_id(employee_id.value())
            .one(self.connection())
            .await?;

        Ok(model.map(from_model))
    }
}

fn from_model(model: employee::Model) -> Employee {
    Employee {
        id: EmployeeId::from_raw(model.id),
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        business_unit: model.business_unit,
        team_name: model.team_name,
        score: model.score,
        created_at: model.created_at,
    }
}
