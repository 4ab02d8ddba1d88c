//! HTTP request handlers for the scheduling API.
//!
//! Every handler resolves the acting profile from the `x-profile-id`
//! header, calls one engine operation and serialises the resulting
//! [`Outcome`](crate::models::Outcome) or error.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::CertificationGrant;
use crate::models::{AvailabilityDraft, ReservationDraft, ShiftDraft, SwapProposal, TrainingDraft};

use super::request::{
    CancelTrainingRequest, InvitationRequest, ProfileRequest, ReservationReviewRequest,
    ReviewNoteRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Header naming the acting profile. Identity is resolved upstream.
pub const ACTOR_HEADER: &str = "x-profile-id";

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/profiles", post(register_profile_handler))
        .route("/weeks/:date", get(week_handler))
        .route("/weeks/:date/publish", post(publish_week_handler))
        .route("/weeks/:date/unpublish", post(unpublish_week_handler))
        .route(
            "/weeks/:date/shifts",
            get(week_shifts_handler).post(create_shift_handler),
        )
        .route(
            "/weeks/:date/shifts/:shift_id",
            put(update_shift_handler).delete(delete_shift_handler),
        )
        .route("/weeks/:date/shifts/:shift_id/swaps", post(request_swap_handler))
        .route("/weeks/:date/my-shifts", get(my_shifts_handler))
        .route(
            "/weeks/:date/availability",
            get(week_availability_handler).post(submit_availability_handler),
        )
        .route(
            "/weeks/:date/availability/:availability_id",
            put(update_availability_handler).delete(remove_availability_handler),
        )
        .route("/weeks/:date/swaps", get(pending_swaps_handler))
        .route("/weeks/:date/trainings", post(add_training_handler))
        .route("/weeks/:date/trainings/:training_id", delete(remove_training_handler))
        .route("/availability/:availability_id/replicate", post(replicate_availability_handler))
        .route("/swaps/:swap_id/approve", post(approve_swap_handler))
        .route("/swaps/:swap_id/deny", post(deny_swap_handler))
        .route("/swaps/:swap_id/cancel", post(cancel_swap_handler))
        .route("/trainings", get(trainings_handler).post(create_training_handler))
        .route("/trainings/:training_id/signup", post(sign_up_handler))
        .route("/trainings/:training_id/cancel", post(cancel_training_handler))
        .route(
            "/trainings/:training_id/waitlist",
            get(waitlist_handler)
                .post(join_waitlist_handler)
                .delete(leave_waitlist_handler),
        )
        .route("/waitlist/:entry_id/respond", post(respond_invitation_handler))
        .route("/cancellations", get(pending_cancellations_handler))
        .route("/cancellations/:request_id/approve", post(approve_cancellation_handler))
        .route("/cancellations/:request_id/deny", post(deny_cancellation_handler))
        .route("/certifications", post(grant_certifications_handler))
        .route(
            "/reservations",
            get(reservations_handler).post(request_reservation_handler),
        )
        .route("/reservations/:reservation_id/review", post(review_reservation_handler))
        .with_state(state)
}

/// Reads the acting profile id from the request headers.
fn actor(headers: &HeaderMap) -> ApiResult<Uuid> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or_else(|| ApiErrorResponse::bad_request(ApiError::missing_actor(ACTOR_HEADER)))
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn json_body<T>(correlation_id: Uuid, payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Serialises a handler result and logs its completion.
fn respond<T: Serialize>(correlation_id: Uuid, operation: &'static str, result: ApiResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                status = %err.status,
                code = %err.error.code,
                "Request failed"
            );
            (
                err.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(err.error),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Handler for POST /profiles.
///
/// Syncs a profile from the identity provider. No actor header is needed.
async fn register_profile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = json_body(correlation_id, payload).and_then(|request| {
        Ok(state.scheduler().register_profile(request.into())?)
    });
    respond(correlation_id, "register_profile", result)
}

async fn week_handler(State(state): State<AppState>, Path(date): Path<NaiveDate>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.scheduler().week(date).map_err(Into::into);
    respond(correlation_id, "week", result)
}

async fn publish_week_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().publish_week(actor, date)?));
    respond(correlation_id, "publish_week", result)
}

async fn unpublish_week_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().unpublish_week(actor, date)?));
    respond(correlation_id, "unpublish_week", result)
}

async fn week_shifts_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().week_shifts(actor, date)?));
    respond(correlation_id, "week_shifts", result)
}

async fn my_shifts_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| Ok(state.scheduler().my_shifts(actor, date)?));
    respond(correlation_id, "my_shifts", result)
}

async fn create_shift_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
    payload: Result<Json<ShiftDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state.scheduler().create_shift(actor, date, draft)?)
    });
    respond(correlation_id, "create_shift", result)
}

async fn update_shift_handler(
    State(state): State<AppState>,
    Path((date, shift_id)): Path<(NaiveDate, Uuid)>,
    headers: HeaderMap,
    payload: Result<Json<ShiftDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state.scheduler().update_shift(actor, date, shift_id, draft)?)
    });
    respond(correlation_id, "update_shift", result)
}

async fn delete_shift_handler(
    State(state): State<AppState>,
    Path((date, shift_id)): Path<(NaiveDate, Uuid)>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().delete_shift(actor, date, shift_id)?));
    respond(correlation_id, "delete_shift", result)
}

async fn request_swap_handler(
    State(state): State<AppState>,
    Path((date, shift_id)): Path<(NaiveDate, Uuid)>,
    headers: HeaderMap,
    payload: Result<Json<SwapProposal>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let proposal = json_body(correlation_id, payload)?;
        Ok(state.scheduler().request_swap(actor, date, shift_id, proposal)?)
    });
    respond(correlation_id, "request_swap", result)
}

async fn pending_swaps_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().pending_swaps(actor, date)?));
    respond(correlation_id, "pending_swaps", result)
}

async fn approve_swap_handler(
    State(state): State<AppState>,
    Path(swap_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<ReviewNoteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let request = json_body(correlation_id, payload)?;
        Ok(state.scheduler().approve_swap(actor, swap_id, request.note)?)
    });
    respond(correlation_id, "approve_swap", result)
}

async fn deny_swap_handler(
    State(state): State<AppState>,
    Path(swap_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<ReviewNoteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let request = json_body(correlation_id, payload)?;
        Ok(state.scheduler().deny_swap(actor, swap_id, request.note)?)
    });
    respond(correlation_id, "deny_swap", result)
}

async fn cancel_swap_handler(
    State(state): State<AppState>,
    Path(swap_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| Ok(state.scheduler().cancel_swap(actor, swap_id)?));
    respond(correlation_id, "cancel_swap", result)
}

async fn week_availability_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().week_availabilities(actor, date)?));
    respond(correlation_id, "week_availabilities", result)
}

async fn submit_availability_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
    payload: Result<Json<AvailabilityDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state.scheduler().submit_availability(actor, date, draft)?)
    });
    respond(correlation_id, "submit_availability", result)
}

async fn update_availability_handler(
    State(state): State<AppState>,
    Path((date, availability_id)): Path<(NaiveDate, Uuid)>,
    headers: HeaderMap,
    payload: Result<Json<AvailabilityDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state
            .scheduler()
            .update_availability(actor, date, availability_id, draft)?)
    });
    respond(correlation_id, "update_availability", result)
}

async fn remove_availability_handler(
    State(state): State<AppState>,
    Path((date, availability_id)): Path<(NaiveDate, Uuid)>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        Ok(state.scheduler().remove_availability(actor, date, availability_id)?)
    });
    respond(correlation_id, "remove_availability", result)
}

async fn replicate_availability_handler(
    State(state): State<AppState>,
    Path(availability_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        Ok(state.scheduler().replicate_across_semester(actor, availability_id)?)
    });
    respond(correlation_id, "replicate_across_semester", result)
}

async fn trainings_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| Ok(state.scheduler().visible_trainings(actor)?));
    respond(correlation_id, "visible_trainings", result)
}

async fn create_training_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TrainingDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state.scheduler().create_training(actor, draft)?)
    });
    respond(correlation_id, "create_training", result)
}

async fn add_training_handler(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    headers: HeaderMap,
    payload: Result<Json<TrainingDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state.scheduler().add_training_to_week(actor, date, draft)?)
    });
    respond(correlation_id, "add_training_to_week", result)
}

async fn remove_training_handler(
    State(state): State<AppState>,
    Path((date, training_id)): Path<(NaiveDate, Uuid)>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        Ok(state.scheduler().remove_training_from_week(actor, date, training_id)?)
    });
    respond(correlation_id, "remove_training_from_week", result)
}

async fn sign_up_handler(
    State(state): State<AppState>,
    Path(training_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| Ok(state.scheduler().sign_up(actor, training_id)?));
    respond(correlation_id, "sign_up", result)
}

async fn cancel_training_handler(
    State(state): State<AppState>,
    Path(training_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<CancelTrainingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let request = json_body(correlation_id, payload)?;
        Ok(state
            .scheduler()
            .cancel_training(actor, training_id, request.reason)?)
    });
    respond(correlation_id, "cancel_training", result)
}

async fn waitlist_handler(
    State(state): State<AppState>,
    Path(training_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().waitlist_for(actor, training_id)?));
    respond(correlation_id, "waitlist_for", result)
}

async fn join_waitlist_handler(
    State(state): State<AppState>,
    Path(training_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().join_waitlist(actor, training_id)?));
    respond(correlation_id, "join_waitlist", result)
}

async fn leave_waitlist_handler(
    State(state): State<AppState>,
    Path(training_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().leave_waitlist(actor, training_id)?));
    respond(correlation_id, "leave_waitlist", result)
}

async fn respond_invitation_handler(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<InvitationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let request = json_body(correlation_id, payload)?;
        Ok(state
            .scheduler()
            .respond_to_invitation(actor, entry_id, request.response)?)
    });
    respond(correlation_id, "respond_to_invitation", result)
}

async fn pending_cancellations_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().pending_cancellations(actor)?));
    respond(correlation_id, "pending_cancellations", result)
}

async fn approve_cancellation_handler(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().approve_cancellation(actor, request_id)?));
    respond(correlation_id, "approve_cancellation", result)
}

async fn deny_cancellation_handler(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers)
        .and_then(|actor| Ok(state.scheduler().deny_cancellation(actor, request_id)?));
    respond(correlation_id, "deny_cancellation", result)
}

async fn grant_certifications_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CertificationGrant>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let grant = json_body(correlation_id, payload)?;
        Ok(state.scheduler().grant_certifications(actor, grant)?)
    });
    respond(correlation_id, "grant_certifications", result)
}

async fn reservations_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| Ok(state.scheduler().reservations(actor)?));
    respond(correlation_id, "reservations", result)
}

async fn request_reservation_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ReservationDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let draft = json_body(correlation_id, payload)?;
        Ok(state.scheduler().request_reservation(actor, draft)?)
    });
    respond(correlation_id, "request_reservation", result)
}

async fn review_reservation_handler(
    State(state): State<AppState>,
    Path(reservation_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<ReservationReviewRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = actor(&headers).and_then(|actor| {
        let request = json_body(correlation_id, payload)?;
        Ok(state
            .scheduler()
            .review_reservation(actor, reservation_id, request.status)?)
    });
    respond(correlation_id, "review_reservation", result)
}
