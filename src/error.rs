use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use sea_orm::DbErr;
use serde::{Serialize, Serializer};

use crate::campaign::CampaignId;
use crate::employee::EmployeeId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidForm(#[derivative(PartialEq = "ignore")] UrlencodedError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    CampaignNameMissing,
    EmployeeEmailMissing,

    // 404
    PathNotFound,
    CampaignNotFound {
        campaign_id: CampaignId,
    },
    EmployeeNotFound {
        employee_id: EmployeeId,
    },
    EmployeeNotFoundByEmail {
        email: String,
    },

    // 409
    EmployeeEmailExists {
        email: String,
    },

    // 502
    LureGenerationFailed(String),
    DeliveryFailed(String),

    // 500
    InvalidConfig(String),
    ExistentialState(String),
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DbErr),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidForm(_) => "E4001002",
            Error::InvalidQuery(_) => "E4001003",
            Error::CampaignNameMissing => "E4001004",
            Error::EmployeeEmailMissing => "E4001005",
            Error::PathNotFound => "E4041000",
            Error::CampaignNotFound { .. } => "E4041001",
            Error::EmployeeNotFound { .. } => "E4041002",
            Error::EmployeeNotFoundByEmail { .. } => "E4041003",
            Error::EmployeeEmailExists { .. } => "E4091000",
            Error::LureGenerationFailed(_) => "E5021000",
            Error::DeliveryFailed(_) => "E5021001",
            Error::InvalidConfig(_) => "E5001000",
            Error::ExistentialState(_) => "E5001001",
            Error::FailedDatabaseCall(_) => "E5001002",
            Error::IoError(_) => "E5001003",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::CampaignNameMissing => "A campaign requires a non-empty name",
            Error::EmployeeEmailMissing => "An employee requires a non-empty email",
            Error::PathNotFound => "The requested path was not found",
            Error::CampaignNotFound { .. } => "The requested campaign was not found",
            Error::EmployeeNotFound { .. } => "The requested employee was not found",
            Error::EmployeeNotFoundByEmail { .. } => {
                "No employee is registered under the given email"
            }
            Error::EmployeeEmailExists { .. } => {
                "An employee with the given email already exists"
            }
            Error::LureGenerationFailed(_) => "The lure generation service failed",
            Error::DeliveryFailed(_) => "The mail delivery service failed",
            Error::InvalidConfig(_) => "The server configuration is invalid",
            Error::ExistentialState(_) => "The server detected an invalid state",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::CampaignNameMissing => StatusCode::BAD_REQUEST,
            Error::EmployeeEmailMissing => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::EmployeeNotFound { .. } => StatusCode::NOT_FOUND,
            Error::EmployeeNotFoundByEmail { .. } => StatusCode::NOT_FOUND,
            Error::EmployeeEmailExists { .. } => StatusCode::CONFLICT,
            Error::LureGenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Error::DeliveryFailed(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::ExistentialState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Envelope<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Envelope {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DbErr> for Error {
    fn from(error: DbErr) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
