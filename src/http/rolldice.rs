//! `GET /rolldice`: the flag-gated, instrumented dice roll.
//!
//! Per request, in order:
//! 1. evaluate the slow-roll flag (errors degrade to `false`)
//! 2. open the `roll` span with the flag attributes
//! 3. pause for the slow-roll delay when the flag is on
//! 4. roll the die
//! 5. record `roll.value` on the span and count the roll
//! 6. stream `<n>\n` back

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use crate::dice::Roll;
use crate::flags::EvaluationContext;
use crate::http::request::user_agent;
use crate::http::response::LineBody;
use crate::http::server::AppState;
use crate::observability::tracing::roll_span;

pub async fn rolldice(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let settings = &state.roll;

    let context = EvaluationContext::for_request(
        settings.context_mode,
        user_agent(&headers),
        settings.targeting_key.as_deref(),
    );
    let slow = state
        .flags
        .boolean_value(&settings.flag_key, false, &context)
        .await;

    let span = roll_span(&settings.flag_key, state.flags.provider_name(), slow, &context);

    let roll = async {
        if slow {
            tracing::debug!(delay = ?settings.slow_roll, "Slowing the roll");
            state.delay.pause(settings.slow_roll).await;
        }

        let roll = Roll::random();
        tracing::Span::current().record("roll.value", u64::from(roll.value()));
        state.metrics.record(roll);

        tracing::debug!(roll = roll.value(), "Dice rolled");
        roll
    }
    .instrument(span.clone())
    .await;

    LineBody::new(format!("{}\n", roll), span).into_response()
}
