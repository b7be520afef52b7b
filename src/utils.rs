use hyper::header::{self, HeaderValue};
use hyper::{Body, Response, StatusCode};

pub fn apply_cors(response: &mut Response<Body>) {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
}

pub fn apply_content_type(response: &mut Response<Body>) {
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
}

/// Plain text response with the given status.
pub fn plain_text(status: StatusCode, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    apply_cors(&mut response);
    apply_content_type(&mut response);
    *response.status_mut() = status;
    response
}
