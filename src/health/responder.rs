//! Constant liveness response.

use axum::body::Body;
use axum::http::{header, Method, Response, StatusCode};

/// Body returned to liveness probes.
pub const HEALTHY_BODY: &str = "healthy";

/// Answer a request to the probe path. GET and HEAD only.
pub fn respond(method: &Method) -> Response<Body> {
    match *method {
        Method::GET => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(HEALTHY_BODY))
            .expect("static response"),
        Method::HEAD => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::empty())
            .expect("static response"),
        _ => Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(header::ALLOW, "GET, HEAD")
            .body(Body::empty())
            .expect("static response"),
    }
}
