//! Request dispatcher
//!
//! Maps `(method, path segments)` onto the behavior handlers. Every
//! handler is a stateless transformation of request parameters into a
//! response; the only shared piece is the injected random generator.

mod delay;
mod mirror;
mod status;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::fmt;

use crate::config::AppState;
use crate::logger;
use crate::response;

pub use mirror::PrintTarget;

/// Dispatch a request to its behavior handler.
///
/// Generic over the body type so tests can drive it with `Full<Bytes>`
/// instead of a live connection's `Incoming`.
pub async fn handle_request<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: fmt::Display,
{
    if state.config.logging.access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .trim_end_matches('/')
        .split('/')
        .collect();

    let resp = match segments.as_slice() {
        ["health"] => match method {
            Method::GET => status::health(),
            _ => method_not_allowed(&method, &path),
        },
        ["sleep", seconds] | ["timeout", seconds] => match method {
            Method::GET => {
                let trace_id = req
                    .headers()
                    .get("TraceID")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string);
                delay::sleep_seconds(seconds, trace_id.as_deref()).await
            }
            _ => method_not_allowed(&method, &path),
        },
        ["sleepms", "max", max_ms, "min", min_ms, "messagelength", "max", max_ml, "min", min_ml] => {
            match method {
                Method::GET | Method::POST => {
                    delay::sleep_ms_message_length(max_ms, min_ms, max_ml, min_ml, &state.rng)
                        .await
                }
                _ => method_not_allowed(&method, &path),
            }
        }
        ["httpResponseCode", code] => match method {
            Method::GET | Method::POST => status::http_response_code(code),
            _ => method_not_allowed(&method, &path),
        },
        ["mirror"] => match method {
            Method::GET | Method::POST => mirror::mirror(req).await,
            _ => method_not_allowed(&method, &path),
        },
        ["print", "stdout"] => match method {
            Method::POST => mirror::print_body(req, PrintTarget::Stdout).await,
            _ => method_not_allowed(&method, &path),
        },
        ["print", "stderr"] => match method {
            Method::POST => mirror::print_body(req, PrintTarget::Stderr).await,
            _ => method_not_allowed(&method, &path),
        },
        _ => {
            logger::log_debug(&format!("No route for {path}"));
            response::build_404_response()
        }
    };

    Ok(resp)
}

fn method_not_allowed(method: &Method, path: &str) -> Response<Full<Bytes>> {
    logger::log_warning(&format!("Method not allowed: {method} {path}"));
    response::build_405_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::random::BoundedRng;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn test_state() -> AppState {
        AppState {
            config: Config::test_default(),
            rng: BoundedRng::with_seed(1),
        }
    }

    fn get(path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn post(path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state();
        let resp = handle_request(get("/health"), &state).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "OK");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = test_state();
        for path in ["/", "/nope", "/sleep", "/sleep/1/extra", "/print/other"] {
            let resp = handle_request(get(path), &state).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let state = test_state();
        let resp = handle_request(post("/health", ""), &state).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = handle_request(get("/print/stdout"), &state).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/mirror")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = handle_request(req, &state).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_status_code_echoed() {
        let state = test_state();
        for code in [200_u16, 204, 404, 503, 599, 100] {
            let resp = handle_request(get(&format!("/httpResponseCode/{code}")), &state)
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), code);
        }
    }

    #[tokio::test]
    async fn test_status_code_body() {
        let state = test_state();
        let resp = handle_request(get("/httpResponseCode/503"), &state)
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(body_string(resp).await, "{\"code\":\"503\"}\n");
    }

    #[tokio::test]
    async fn test_status_code_invalid() {
        let state = test_state();
        for bad in ["99", "600", "-1", "abc", "4o4"] {
            let resp = handle_request(get(&format!("/httpResponseCode/{bad}")), &state)
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "code {bad}");
            assert_eq!(
                body_string(resp).await.trim_end(),
                "{ \"error\": \"invalid code\" }",
                "code {bad}"
            );
        }
    }

    #[tokio::test]
    async fn test_sleepms_accepts_post() {
        let state = test_state();
        let resp = handle_request(
            post("/sleepms/max/1/min/0/messagelength/max/8/min/8", ""),
            &state,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
