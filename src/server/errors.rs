use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};

#[derive(Debug, Display, Error)]
pub enum UserError {
    #[display("resource not found")]
    UrlNotFound,
    #[display("missing or unknown tenant token")]
    Unauthorized,
    #[display("invalid input values: {_0}")]
    FormInputValueError(#[error(not(source))] String),
}

fn json_error(status: http::StatusCode, message: String) -> web::HttpResponse {
    web::HttpResponse::build(status).json(&serde_json::json!({
        "status": "error",
        "message": message,
    }))
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        json_error(self.status_code(), self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            UserError::FormInputValueError(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    #[display("[InternalServerError] {_0}")]
    InternalServerError(#[error(not(source))] String),
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{}", self);

        // internal details stay in the logs
        json_error(self.status_code(), "internal server error".to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}
