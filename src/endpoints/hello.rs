use hyper::{Body, Response, StatusCode};

use crate::utils::plain_text;

pub fn hello() -> Response<Body> {
    plain_text(StatusCode::OK, "Hello from hyper!")
}
