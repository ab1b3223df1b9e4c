use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// Body sent when /httpResponseCode receives a bad code. The exact text is
/// part of the endpoint's contract.
pub const INVALID_CODE_BODY: &str = "{ \"error\": \"invalid code\" }\n";

#[derive(Debug, Serialize)]
pub struct MsgReport {
    pub msg: String,
}

#[derive(Debug, Serialize)]
pub struct CodeReport {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Serialize `value` as the JSON body of a response with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    let mut body = serde_json::to_string(value).unwrap_or_else(|e| {
        logger::log_error(&format!("JSON serialization failed: {e}"));
        "{}".to_string()
    });
    body.push('\n');
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("Failed to build JSON response")
}

pub fn json_error_500(message: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorBody {
            error: message.to_string(),
        },
    )
}

pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(body.into()))
        .expect("Failed to build text response")
}

pub fn text_error_500(message: &str) -> Response<Full<Bytes>> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

pub fn empty_200() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(Bytes::new()))
        .expect("Failed to build empty response")
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::NOT_FOUND, "Not Found")
}

pub fn build_405_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
