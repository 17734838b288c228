use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type EmployeeId = TypedId<Employee>;

/// A simulation target, tracked by unique email. The score field is
/// operator-maintained bookkeeping; recording an event does not touch it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub business_unit: String,
    pub team_name: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

impl TypedIdMarker for Employee {
    fn tag() -> &'static str {
        "EMP"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub business_unit: String,
    pub team_name: String,
    pub score: i64,
}
