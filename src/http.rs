use crate::{
    availability::{daily_summary, day_appointments, render_day_schedule},
    backend::AppointmentBackend,
    booking::BookingValidator,
    calendar::parse_date,
    catalog::Service,
    clock::Clock,
    configuration::Configuration,
    error::{BookingError, StoreError},
    types::{Actor, Appointment, BookingRequest, DailySummary, ScheduledSlot},
};
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use futures::{Stream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref CONTACT_REGEX: Regex =
        Regex::new(r"^\+?[0-9()\- ]{8,20}$").expect("contact pattern is valid");
}

const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

#[derive(Clone)]
pub struct AppState<T: AppointmentBackend, C: Configuration> {
    pub backend: T,
    pub configuration: C,
    pub validator: BookingValidator,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BookRequest {
    #[serde(default)]
    actor_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    actor_name: String,
    #[validate(regex(path = *CONTACT_REGEX))]
    actor_contact: String,
    date: String,
    start_slot: String,
    service_id: String,
}

impl TryFrom<BookRequest> for BookingRequest {
    type Error = BookingError;

    fn try_from(body: BookRequest) -> Result<Self, Self::Error> {
        let name = body.actor_name.trim();
        if name.is_empty() {
            return Err(BookingError::InvalidInput("actor name is empty".into()));
        }
        Ok(BookingRequest {
            actor: Actor {
                id: body.actor_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: name.into(),
                contact: body.actor_contact,
            },
            date: parse_date(&body.date)?,
            start_slot: body.start_slot.parse()?,
            service_id: body.service_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CancelRequest {
    id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DateQuery {
    date: Option<String>,
}

pub fn create_app<T: AppointmentBackend, C: Configuration>(
    backend: T,
    configuration: C,
    validator: BookingValidator,
    clock: Arc<dyn Clock>,
) -> Router {
    let state = AppState {
        backend,
        configuration,
        validator,
        clock,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/services", get(get_services::<T, C>))
        .route("/slots", get(get_slots::<T, C>))
        .route("/book", post(book_appointment::<T, C>));

    let admin = Router::new()
        .route("/schedule", get(get_schedule::<T, C>))
        .route("/summary", get(get_summary::<T, C>))
        .route("/appointments", get(get_appointments::<T, C>))
        .route("/appointments/stream", get(appointment_stream::<T, C>))
        .route("/cancel", post(cancel_appointment::<T, C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<T, C>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn admin_auth<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let password = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .map(|value| value.to_str().unwrap_or("").to_owned());

    match password {
        Some(password) if password == state.configuration.password() => {
            Ok(next.run(request).await)
        }
        Some(_) => {
            warn!(path = %request.uri().path(), "Rejected admin request with wrong password");
            Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
        }
        None => Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string())),
    }
}

fn requested_date<T: AppointmentBackend, C: Configuration>(
    state: &AppState<T, C>,
    query: &DateQuery,
) -> Result<NaiveDate, BookingError> {
    match &query.date {
        Some(date) => parse_date(date),
        None => Ok(state.clock.today()),
    }
}

async fn get_services<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Json<Vec<Service>> {
    Json(state.validator.catalog().services().to_vec())
}

async fn get_slots<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<ScheduledSlot>>, BookingError> {
    let date = requested_date(&state, &query)?;
    if state.validator.hours().is_closed_day(date) {
        return Err(BookingError::ClosedDay);
    }
    let appointments = state.backend.appointments();
    Ok(Json(render_day_schedule(
        date,
        state.validator.hours(),
        state.validator.catalog(),
        &appointments,
        false,
    )))
}

async fn book_appointment<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Valid(Json(body)): Valid<Json<BookRequest>>,
) -> Result<Json<Appointment>, BookingError> {
    let request = BookingRequest::try_from(body)?;
    if request.date < state.clock.today() {
        return Err(BookingError::PastDate);
    }
    let appointment = state.backend.book(request)?;
    Ok(Json(appointment))
}

async fn get_schedule<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<ScheduledSlot>>, BookingError> {
    let date = requested_date(&state, &query)?;
    let appointments = state.backend.appointments();
    Ok(Json(render_day_schedule(
        date,
        state.validator.hours(),
        state.validator.catalog(),
        &appointments,
        true,
    )))
}

async fn get_summary<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailySummary>, BookingError> {
    let date = requested_date(&state, &query)?;
    let summary = daily_summary(date, &state.backend.appointments()).ok_or_else(|| {
        error!(%date, "Daily revenue overflowed");
        StoreError::RevenueOverflow(date)
    })?;
    Ok(Json(summary))
}

async fn get_appointments<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Appointment>>, BookingError> {
    let date = requested_date(&state, &query)?;
    Ok(Json(day_appointments(date, &state.backend.appointments())))
}

async fn appointment_stream<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    info!("Appointment stream subscribed");
    let stream = state
        .backend
        .appointment_stream()
        .map(|appointments| Event::default().json_data(appointments));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn cancel_appointment<T: AppointmentBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Json(cancel): Json<CancelRequest>,
) -> impl IntoResponse {
    match state.backend.cancel(&cancel.id) {
        Ok(()) => (StatusCode::OK, "Appointment cancelled".to_string()),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
