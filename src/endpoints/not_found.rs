use hyper::{Body, Response, StatusCode};

use crate::utils::plain_text;

pub fn not_found() -> Response<Body> {
    plain_text(StatusCode::NOT_FOUND, "Not found")
}
