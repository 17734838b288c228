use actix_web::web::{Data, Json};
use actix_web::{get, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::{manager, Employee, EmployeeDraft, EmployeeId};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateEmployeeBody {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub business_unit: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub score: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EmployeeBody {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub business_unit: String,
    pub team_name: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

impl EmployeeBody {
    pub fn render(employee: Employee) -> EmployeeBody {
        EmployeeBody {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            business_unit: employee.business_unit,
            team_name: employee.team_name,
            score: employee.score,
            created_at: employee.created_at,
        }
    }
}

#[post("/employees")]
#[tracing::instrument(skip(db))]
async fn create_employee(
    db: Data<Box<dyn Database>>,
    body: Json<CreateEmployeeBody>,
) -> Result<Json<EmployeeBody>, Error> {
    let body = body.into_inner();

    let employee = manager::add_employee(
        db.get_ref().as_ref(),
        EmployeeDraft {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            business_unit: body.business_unit,
            team_name: body.team_name,
            score: body.score,
        },
    )
    .await?;

    Ok(Json(EmployeeBody::render(employee)))
}

#[get("/employees")]
#[tracing::instrument(skip(db))]
async fn get_employees(db: Data<Box<dyn Database>>) -> Result<Json<Vec<EmployeeBody>>, Error> {
    let employees = manager::get_employees(db.get_ref().as_ref()).await?;

    Ok(Json(employees.into_iter().map(EmployeeBody::render).collect()))
}
