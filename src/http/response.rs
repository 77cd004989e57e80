//! Response construction.
//!
//! # Responsibilities
//! - Build static asset responses with computed cache headers
//! - Keep HEAD semantics (headers only, no body)
//!
//! # Design Decisions
//! - Cache headers come from the policy verbatim; this module only
//!   copies them onto the response

use axum::body::Body;
use axum::http::{header, Response, StatusCode};

use crate::assets::cache_policy::CacheHeaders;
use crate::assets::store::StaticAsset;

/// Build a 200 response for a static asset.
pub fn static_asset_response(
    asset: StaticAsset,
    cache: &CacheHeaders,
    head_only: bool,
) -> Response<Body> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, asset.content_type)
        .header(header::CONTENT_LENGTH, asset.bytes.len())
        .header(header::CACHE_CONTROL, cache.cache_control.as_str());

    if let Some(expires) = &cache.expires {
        builder = builder.header(header::EXPIRES, expires.as_str());
    }
    if let Some(etag) = &cache.etag {
        builder = builder.header(header::ETAG, etag.as_str());
    }

    let body = if head_only {
        Body::empty()
    } else {
        Body::from(asset.bytes)
    };
    builder.body(body).expect("static headers are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset() -> StaticAsset {
        StaticAsset {
            bytes: b"body{}".to_vec(),
            content_type: "text/css",
        }
    }

    #[test]
    fn copies_cache_headers() {
        let cache = CacheHeaders {
            cache_control: "public, max-age=31536000, immutable".to_string(),
            expires: Some("Thu, 01 Jan 2027 00:00:00 GMT".to_string()),
            etag: Some("W/\"abcd\"".to_string()),
        };
        let res = static_asset_response(asset(), &cache, false);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CACHE_CONTROL],
            "public, max-age=31536000, immutable"
        );
        assert_eq!(res.headers()[header::ETAG], "W/\"abcd\"");
    }

    #[test]
    fn no_store_omits_expires_and_etag() {
        let cache = CacheHeaders {
            cache_control: "no-store".to_string(),
            expires: None,
            etag: None,
        };
        let res = static_asset_response(asset(), &cache, false);
        assert!(res.headers().get(header::EXPIRES).is_none());
        assert!(res.headers().get(header::ETAG).is_none());
    }

    #[test]
    fn head_keeps_content_length_header() {
        let cache = CacheHeaders {
            cache_control: "no-store".to_string(),
            expires: None,
            etag: None,
        };
        let res = static_asset_response(asset(), &cache, true);
        assert_eq!(res.headers()[header::CONTENT_LENGTH], "6");
    }
}
