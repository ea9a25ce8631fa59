use crate::tracing::RequestId;
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

/// Header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id we are willing to echo back.
const MAX_REQUEST_ID_LEN: usize = 128;

fn incoming_request_id(request: &Request) -> Option<(RequestId, HeaderValue)> {
    let value = request.headers().get(REQUEST_ID_HEADER)?;
    let text = value.to_str().ok()?.trim();
    if text.is_empty() || text.len() > MAX_REQUEST_ID_LEN {
        return None;
    }
    Some((RequestId::new(text), value.clone()))
}

fn fresh_request_id() -> (RequestId, HeaderValue) {
    let request_id = RequestId::default();
    // uuid text is always a valid header value
    let value = HeaderValue::from_str(request_id.as_str())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
    (request_id, value)
}

/// Attaches a request id to every request: reuses a sane `x-request-id` from the
/// caller or generates one, scopes it for the handler and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let (request_id, header_value) =
        incoming_request_id(&request).unwrap_or_else(fresh_request_id);

    request
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value.clone());
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_str(),
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = crate::tracing::scope_request_id(request_id, next.run(request))
        .instrument(span)
        .await;

    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);

    response
}
