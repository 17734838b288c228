use crate::database::Database;
use crate::error::Error;

use super::{Employee, EmployeeDraft};

/// Pre-check then insert; a concurrent add of the same email can still hit
/// the unique index, but launches are operator-driven and effectively
/// single-writer.
#[tracing::instrument(skip(db))]
pub async fn add_employee(db: &dyn Database, draft: EmployeeDraft) -> Result<Employee, Error> {
    let email = draft.email.trim().to_owned();
    if email.is_empty() {
        return Err(Error::EmployeeEmailMissing);
    }

    if db.employees().fetch_employee_by_email(&email).await?.is_some() {
        return Err(Error::EmployeeEmailExists { email });
    }

    let draft = EmployeeDraft { email, ..draft };
    db.employees().insert_employee(&draft).await
}

#[tracing::instrument(skip(db))]
pub async fn get_employees(db: &dyn Database) -> Result<Vec<Employee>, Error> {
    db.employees().fetch_employees().await
}
