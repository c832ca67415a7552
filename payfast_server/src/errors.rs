use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use payfast_engine::{traits::OrderManagementError, CheckoutApiError, NotificationApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderManagementError> for ServerError {
    fn from(e: OrderManagementError) -> Self {
        match e {
            OrderManagementError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id} does not exist")),
            e => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CheckoutApiError> for ServerError {
    fn from(e: CheckoutApiError) -> Self {
        match e {
            CheckoutApiError::UnknownFields(_) | CheckoutApiError::InvalidAmount(_) => {
                Self::InvalidRequestBody(e.to_string())
            },
            CheckoutApiError::DatabaseError(e) => e.into(),
        }
    }
}

impl From<NotificationApiError> for ServerError {
    fn from(e: NotificationApiError) -> Self {
        match e {
            NotificationApiError::MissingPaymentId | NotificationApiError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            NotificationApiError::DatabaseError(e) => e.into(),
        }
    }
}
