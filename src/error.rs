use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid weekday {0} (expected 0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(u8),

    #[error("Cannot show more than 50 days at once (requested {days})")]
    RangeTooLong { days: i64 },

    #[error("No cell for room '{room}' on '{date}'")]
    UnknownCell { room: String, date: String },

    #[error("Unknown cell event '{0}'")]
    UnknownEvent(String),

    #[error("Event '{0}' needs a group index and geometry")]
    MissingGeometry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ViewerResult<T> = Result<T, ViewerError>;

impl ResponseError for ViewerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ViewerError::UnknownCell { .. } => StatusCode::NOT_FOUND,
            ViewerError::Io(_) | ViewerError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}
