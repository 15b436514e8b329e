//! `GET /`: send clients to the roll endpoint.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::Span;

use crate::config::HomepageMode;
use crate::http::response::LineBody;
use crate::http::server::AppState;

pub const ROLL_PATH: &str = "/rolldice";
pub const HOMEPAGE_HINT: &str = "Roll the dice at /rolldice\n";

/// 308 to `/rolldice`, or a plain-text hint, depending on configuration.
pub async fn homepage(State(state): State<AppState>) -> Response {
    match state.homepage {
        HomepageMode::Redirect => Redirect::permanent(ROLL_PATH).into_response(),
        HomepageMode::Hint => LineBody::new(HOMEPAGE_HINT, Span::current()).into_response(),
    }
}
