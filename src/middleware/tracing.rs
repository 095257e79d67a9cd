use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id carried through the middleware stack so span construction
/// does not have to re-read the header.
#[derive(Debug, Clone)]
pub struct RequestId(String);

impl RequestId {
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| Self(s.to_string()))
            .unwrap_or_else(|| Self(Uuid::new_v4().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Propagate a request id end to end: reuse the caller's `x-request-id` or
/// mint one, record it as a [`RequestId`] extension for the request span,
/// and echo it on the response.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(req.headers());

    match HeaderValue::from_str(request_id.as_str()) {
        Ok(header_value) => {
            req.headers_mut()
                .insert(REQUEST_ID_HEADER, header_value.clone());
            req.extensions_mut().insert(request_id);

            let mut response = next.run(req).await;
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER, header_value);
            response
        }
        // to_str above only accepts visible ASCII, so a resolved id is
        // always a valid header value; this arm is for completeness.
        Err(_) => next.run(req).await,
    }
}
