#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
struct HttpApiError {
    status: StatusCode,
    error: ApiError,
}

impl From<ApiError> for HttpApiError {
    fn from(error: ApiError) -> Self {
        let status = match error.error_code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::SessionRequired => StatusCode::UNAUTHORIZED,
            ErrorCode::SimulationUnavailable => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, error }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
