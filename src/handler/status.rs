//! Health and status-code handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::logger;
use crate::response::{self, CodeReport, INVALID_CODE_BODY};

pub fn health() -> Response<Full<Bytes>> {
    response::text_response(StatusCode::OK, "OK")
}

/// Answer with exactly the requested status code, or 500 for anything
/// outside [100, 599].
pub fn http_response_code(raw_code: &str) -> Response<Full<Bytes>> {
    let status = raw_code
        .parse::<u16>()
        .ok()
        .filter(|code| (100..=599).contains(code))
        .and_then(|code| StatusCode::from_u16(code).ok());

    match status {
        Some(status) => response::json_response(
            status,
            &CodeReport {
                code: status.as_u16().to_string(),
            },
        ),
        None => {
            logger::log_debug(&format!("Invalid code: '{raw_code}'"));
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(INVALID_CODE_BODY)))
                .expect("Failed to build invalid-code response")
        }
    }
}
