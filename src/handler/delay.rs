//! Delay handlers
//!
//! `/sleep/{seconds}` (and its `/timeout` alias) suspends the request task
//! for a fixed duration; `/sleepms/...` samples both the delay and an
//! optional random payload from caller-supplied ranges. Only the task
//! serving the request sleeps; other requests keep flowing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::time::Duration;

use crate::logger;
use crate::random::BoundedRng;
use crate::response::{self, MsgReport};

pub async fn sleep_seconds(raw_seconds: &str, trace_id: Option<&str>) -> Response<Full<Bytes>> {
    let Ok(seconds) = raw_seconds.parse::<u64>() else {
        logger::log_debug("Failure reading timeout seconds");
        return response::text_error_500("Invalid seconds value");
    };

    let trace = trace_id.unwrap_or("-");
    logger::log_debug(&format!("[{trace}] Sleeping for {seconds} s"));
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    logger::log_debug(&format!("[{trace}] Slept for {seconds} s"));

    response::json_response(
        StatusCode::OK,
        &MsgReport {
            msg: format!("Slept for {seconds} seconds"),
        },
    )
}

pub async fn sleep_ms_message_length(
    raw_max_ms: &str,
    raw_min_ms: &str,
    raw_max_ml: &str,
    raw_min_ml: &str,
    rng: &BoundedRng,
) -> Response<Full<Bytes>> {
    let sleep_range = parse_range(raw_min_ms, raw_max_ms).and_then(|(min, max)| {
        rng.sample_int(min, max)
    });
    let Ok(sleep_ms) = sleep_range else {
        logger::log_debug("Invalid timeout ms values");
        return response::json_error_500("invalid sleepms range");
    };

    let length_range = parse_range(raw_min_ml, raw_max_ml).and_then(|(min, max)| {
        rng.sample_int(min, max)
    });
    let Ok(message_length) = length_range else {
        logger::log_debug("Invalid message length values");
        return response::json_error_500("invalid messagelength range");
    };

    logger::log_debug(&format!("Sleeping for {sleep_ms} ms"));
    #[allow(clippy::cast_sign_loss)] // sample_int rejects negatives
    tokio::time::sleep(Duration::from_millis(sleep_ms as u64)).await;
    logger::log_debug(&format!("Slept for {sleep_ms} ms"));

    let msg = if message_length > 0 {
        logger::log_debug(&format!(
            "Replying with a random message length of {message_length}"
        ));
        #[allow(clippy::cast_sign_loss)] // sample_int rejects negatives
        let len = message_length as usize;
        rng.sample_string(len)
    } else {
        format!("Slept for {sleep_ms} milliseconds")
    };

    response::json_response(StatusCode::OK, &MsgReport { msg })
}

fn parse_range(raw_min: &str, raw_max: &str) -> Result<(i64, i64), crate::error::HandlerError> {
    let parse = |raw: &str| {
        raw.parse::<i64>().map_err(|_| {
            crate::error::HandlerError::InvalidInput(format!("not an integer: '{raw}'"))
        })
    };
    Ok((parse(raw_min)?, parse(raw_max)?))
}
