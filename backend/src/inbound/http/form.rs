//! Translation of mutation outcomes and path identifiers for HTTP.
//!
//! - `Success(Some(nav))` becomes `303 See Other` with `Location`.
//! - `Success(None)` becomes `204 No Content`.
//! - `Failure(state)` becomes `422 Unprocessable Entity` with the form state.

use std::str::FromStr;

use actix_web::HttpResponse;
use actix_web::http::header;
use serde_json::json;

use crate::domain::{Error, IdParseError, MutationOutcome};

/// Render a recoverable outcome.
pub fn outcome_response(outcome: MutationOutcome) -> HttpResponse {
    match outcome {
        MutationOutcome::Success(Some(navigation)) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, navigation.path()))
            .finish(),
        MutationOutcome::Success(None) => HttpResponse::NoContent().finish(),
        MutationOutcome::Failure(state) => HttpResponse::UnprocessableEntity().json(state),
    }
}

/// Parse a path identifier, reporting failures as `400` with field context.
pub(crate) fn parse_path_id<T>(raw: &str) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    raw.parse::<T>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}
