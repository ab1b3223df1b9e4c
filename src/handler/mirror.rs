//! Request echo and print sinks
//!
//! `/mirror` renders the inbound headers and body back as plain text.
//! `/print/stdout` and `/print/stderr` dump the body to the process
//! streams, for harnesses that collect the server's output.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Request, Response, StatusCode};
use std::fmt;
use std::io::Write;

use crate::error::HandlerError;
use crate::logger;
use crate::response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintTarget {
    Stdout,
    Stderr,
}

pub async fn mirror<B>(req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: fmt::Display,
{
    let (parts, body) = req.into_parts();
    let bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(e) => {
            logger::log_error(&e.to_string());
            return response::text_error_500("error parsing body");
        }
    };

    // The dump is assembled as raw bytes; bodies and header values pass
    // through unmodified even when they are not valid UTF-8.
    let mut out = Vec::from(&b"HEADERS\n=======\n"[..]);
    render_headers(&parts.headers, &mut out);
    if !bytes.is_empty() {
        out.extend_from_slice(b"\nBODY\n====\n");
        out.extend_from_slice(&bytes);
        out.push(b'\n');
    }

    response::text_response(StatusCode::OK, out)
}

pub async fn print_body<B>(req: Request<B>, target: PrintTarget) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: fmt::Display,
{
    let bytes = match read_body(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            logger::log_error(&e.to_string());
            return response::text_error_500("error parsing body");
        }
    };

    let result = match target {
        PrintTarget::Stdout => write_line(&mut std::io::stdout().lock(), &bytes),
        PrintTarget::Stderr => write_line(&mut std::io::stderr().lock(), &bytes),
    };
    if let Err(e) = result {
        logger::log_error(&format!("Failed to write to {target:?}: {e}"));
    }

    response::empty_200()
}

async fn read_body<B>(body: B) -> Result<Bytes, HandlerError>
where
    B: Body,
    B::Error: fmt::Display,
{
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => Err(HandlerError::BodyRead(e.to_string())),
    }
}

// Header iteration order follows the underlying map; it is not part of
// the endpoint's contract.
fn render_headers(headers: &HeaderMap, out: &mut Vec<u8>) {
    for name in headers.keys() {
        out.extend_from_slice(name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        for (i, value) in headers.get_all(name).iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(b", ");
            }
            out.extend_from_slice(value.as_bytes());
        }
        out.push(b'\n');
    }
}

fn write_line(sink: &mut impl Write, bytes: &Bytes) -> std::io::Result<()> {
    sink.write_all(bytes)?;
    sink.write_all(b"\n")?;
    sink.flush()
}
