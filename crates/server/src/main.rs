// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use agenda::LifecycleNotifier;
use agenda_api::{
    ApiError, AppointmentCapabilitiesResponse, AppointmentHistoryResponse, AppointmentInfo,
    AppointmentResponse, AuthenticatedActor, AvailabilityResponse, BookingConfig,
    CancelBookingRequest, ChangeServicesRequest, ClientResponse, CreateBookingRequest,
    CreateScheduleRequest, DeleteAppointmentResponse, DeleteScheduleResponse, GlobalCapabilities,
    ListAppointmentsResponse, ListSchedulesResponse, ListServicesResponse, RegisterClientRequest,
    RegisterServiceRequest, ReplaceScheduleStaffRequest, Role, ScheduleInfo, ScheduleResponse,
    ServiceResponse, SetServiceActiveRequest, add_services, cancel_booking, complete_booking,
    compute_global_capabilities, confirm_booking, create_booking, create_schedule,
    deactivate_schedule, delete_appointment, delete_schedule, get_appointment,
    get_appointment_capabilities, get_appointment_history, get_availability, get_client,
    get_schedule, list_appointments_for_staff, list_schedules, list_services, reactivate_schedule,
    register_client, register_service, remove_services, replace_schedule_staff,
    set_service_active, start_booking, translate_domain_error, translate_persistence_error,
};
use agenda_audit::{AuditEvent, AuditScope, Cause};
use agenda_persistence::{Persistence, sqlite_library_version};
use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Agenda Server - HTTP server for the appointment scheduling core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone of the business (all wall-clock times are local to it)
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Slot length in minutes; also the minimum appointment duration
    #[arg(long, default_value_t = 30)]
    slot_length: u32,

    /// Require appointments to be started before they can be completed
    #[arg(long)]
    strict_completion: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Booking rules and the business clock.
    config: Arc<BookingConfig>,
    /// Live event fan-out.
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

// ========================================================================
// Request and response wrappers
// ========================================================================

/// Operator identity and reason carried by every write request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorFields {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// A write request: actor fields plus the operation body, flattened.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WriteRequest<T> {
    #[serde(flatten)]
    actor: ActorFields,
    #[serde(flatten)]
    body: T,
}

/// Body of write requests that carry nothing but the actor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct NoBody {}

/// Body of a client registration: actor identity only, no cause.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterClientApiRequest {
    actor_id: String,
    actor_role: String,
    display_name: String,
}

/// Query parameters identifying the operator on read endpoints.
#[derive(Debug, Deserialize)]
struct ActorQuery {
    actor_id: String,
    actor_role: String,
}

/// Query parameters for availability.
#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    /// The calendar date (`YYYY-MM-DD`).
    date: String,
}

/// Query parameters for a staff member's day.
#[derive(Debug, Deserialize)]
struct StaffDayQuery {
    staff_id: i64,
    date: String,
}

/// Query parameters for the audit timeline endpoint.
#[derive(Debug, Deserialize)]
struct AuditTimelineQuery {
    /// `global`, `schedule`, `appointment`, or `service`.
    scope: String,
    record_id: Option<i64>,
}

/// Serializable representation of an `AuditEvent` for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditEventResponse {
    event_id: Option<i64>,
    scope: String,
    record_id: Option<i64>,
    actor_id: String,
    actor_type: String,
    cause_id: String,
    cause_description: String,
    action_name: String,
    action_details: Option<String>,
    before_snapshot: String,
    after_snapshot: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Parses the actor fields into an authenticated actor and a cause.
fn authenticate(fields: ActorFields) -> Result<(AuthenticatedActor, Cause), HttpError> {
    let role: Role = Role::parse(&fields.actor_role).map_err(ApiError::from)?;
    Ok((
        AuthenticatedActor::new(fields.actor_id, role),
        Cause::new(fields.cause_id, fields.cause_description),
    ))
}

fn authenticate_query(query: ActorQuery) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = Role::parse(&query.actor_role).map_err(ApiError::from)?;
    Ok(AuthenticatedActor::new(query.actor_id, role))
}

/// Converts an `AuditEvent` to an `AuditEventResponse`.
fn audit_event_to_response(event: &AuditEvent) -> AuditEventResponse {
    AuditEventResponse {
        event_id: event.event_id,
        scope: event.scope.kind().to_string(),
        record_id: event.scope.record_id(),
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
    }
}

// ========================================================================
// Capabilities
// ========================================================================

/// Handler for GET `/capabilities`.
async fn handle_global_capabilities(
    Query(query): Query<ActorQuery>,
) -> Result<Json<GlobalCapabilities>, HttpError> {
    let actor: AuthenticatedActor = authenticate_query(query)?;
    Ok(Json(compute_global_capabilities(&actor)))
}

// ========================================================================
// Schedules
// ========================================================================

/// Handler for POST `/schedules`.
async fn handle_create_schedule(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteRequest<CreateScheduleRequest>>,
) -> Result<Json<ScheduleResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        name = %req.body.name,
        "Handling create_schedule request"
    );
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleResponse = create_schedule(&mut persistence, &req.body, &actor, cause)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::ScheduleChanged {
        schedule_id: response.schedule.schedule_id,
    });
    Ok(Json(response))
}

/// Handler for GET `/schedules`.
async fn handle_list_schedules(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListSchedulesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_schedules(&mut persistence)?))
}

/// Handler for GET `/schedules/{schedule_id}`.
async fn handle_get_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
) -> Result<Json<ScheduleInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_schedule(&mut persistence, schedule_id)?))
}

/// Handler for POST `/schedules/{schedule_id}/staff`.
async fn handle_replace_schedule_staff(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<WriteRequest<ReplaceScheduleStaffRequest>>,
) -> Result<Json<ScheduleResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        schedule_id,
        "Handling replace_schedule_staff request"
    );
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleResponse =
        replace_schedule_staff(&mut persistence, schedule_id, &req.body, &actor, cause)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::ScheduleChanged { schedule_id });
    Ok(Json(response))
}

/// Handler for POST `/schedules/{schedule_id}/deactivate`.
async fn handle_deactivate_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<ScheduleResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, schedule_id, "Handling deactivate_schedule request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleResponse =
        deactivate_schedule(&mut persistence, schedule_id, &actor, cause)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::ScheduleChanged { schedule_id });
    Ok(Json(response))
}

/// Handler for POST `/schedules/{schedule_id}/reactivate`.
async fn handle_reactivate_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<ScheduleResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, schedule_id, "Handling reactivate_schedule request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleResponse =
        reactivate_schedule(&mut persistence, schedule_id, &actor, cause)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::ScheduleChanged { schedule_id });
    Ok(Json(response))
}

/// Handler for POST `/schedules/{schedule_id}/delete`.
async fn handle_delete_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<DeleteScheduleResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, schedule_id, "Handling delete_schedule request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteScheduleResponse =
        delete_schedule(&mut persistence, schedule_id, &actor, cause)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::ScheduleChanged { schedule_id });
    Ok(Json(response))
}

/// Handler for GET `/schedules/{schedule_id}/availability`.
async fn handle_get_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    let now = app_state.config.clock.now().map_err(translate_domain_error)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_availability(
        &mut persistence,
        &app_state.config,
        schedule_id,
        &query.date,
        now,
    )?))
}

// ========================================================================
// Service catalog and clients
// ========================================================================

/// Handler for POST `/services`.
async fn handle_register_service(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteRequest<RegisterServiceRequest>>,
) -> Result<Json<ServiceResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, name = %req.body.name, "Handling register_service request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(register_service(
        &mut persistence,
        &req.body,
        &actor,
        cause,
    )?))
}

/// Handler for GET `/services`.
async fn handle_list_services(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListServicesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_services(&mut persistence)?))
}

/// Handler for POST `/services/{service_id}/active`.
async fn handle_set_service_active(
    AxumState(app_state): AxumState<AppState>,
    Path(service_id): Path<i64>,
    Json(req): Json<WriteRequest<SetServiceActiveRequest>>,
) -> Result<Json<ServiceResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        service_id,
        active = req.body.active,
        "Handling set_service_active request"
    );
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(set_service_active(
        &mut persistence,
        service_id,
        &req.body,
        &actor,
        cause,
    )?))
}

/// Handler for POST `/clients`.
async fn handle_register_client(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterClientApiRequest>,
) -> Result<Json<ClientResponse>, HttpError> {
    let role: Role = Role::parse(&req.actor_role).map_err(ApiError::from)?;
    let actor = AuthenticatedActor::new(req.actor_id, role);
    let request = RegisterClientRequest {
        display_name: req.display_name,
    };

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(register_client(&mut persistence, &request, &actor)?))
}

/// Handler for GET `/clients/{client_id}`.
async fn handle_get_client(
    AxumState(app_state): AxumState<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<ClientResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_client(&mut persistence, client_id)?))
}

// ========================================================================
// Appointments
// ========================================================================

/// Handler for POST `/appointments`.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteRequest<CreateBookingRequest>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        staff_id = req.body.staff_id,
        start_at = %req.body.start_at,
        "Handling create_booking request"
    );
    let (actor, cause) = authenticate(req.actor)?;
    let now = app_state.config.clock.now().map_err(translate_domain_error)?;

    let mut persistence = app_state.persistence.lock().await;
    let notifiers: [&dyn LifecycleNotifier; 1] = [app_state.broadcaster.as_ref()];
    Ok(Json(create_booking(
        &mut persistence,
        &app_state.config,
        &req.body,
        &actor,
        cause,
        now,
        &notifiers,
    )?))
}

/// Handler for GET `/appointments?staff_id=..&date=..`.
async fn handle_list_appointments(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<StaffDayQuery>,
) -> Result<Json<ListAppointmentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_appointments_for_staff(
        &mut persistence,
        query.staff_id,
        &query.date,
    )?))
}

/// Handler for GET `/appointments/{appointment_id}`.
async fn handle_get_appointment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<AppointmentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_appointment(&mut persistence, appointment_id)?))
}

/// Handler for GET `/appointments/{appointment_id}/history`.
async fn handle_get_appointment_history(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<AppointmentHistoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_appointment_history(
        &mut persistence,
        appointment_id,
    )?))
}

/// Handler for GET `/appointments/{appointment_id}/capabilities`.
async fn handle_get_appointment_capabilities(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AppointmentCapabilitiesResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate_query(query)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_appointment_capabilities(
        &mut persistence,
        &app_state.config,
        appointment_id,
        &actor,
    )?))
}

/// Signature shared by the status-only lifecycle handlers.
type LifecycleHandler = fn(
    &mut Persistence,
    &BookingConfig,
    i64,
    &AuthenticatedActor,
    Cause,
    &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError>;

async fn run_lifecycle(
    app_state: &AppState,
    appointment_id: i64,
    req: WriteRequest<NoBody>,
    handler: LifecycleHandler,
) -> Result<Json<AppointmentResponse>, HttpError> {
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    // Not Send; must not live across an await
    let notifiers: [&dyn LifecycleNotifier; 1] = [app_state.broadcaster.as_ref()];
    Ok(Json(handler(
        &mut persistence,
        &app_state.config,
        appointment_id,
        &actor,
        cause,
        &notifiers,
    )?))
}

/// Handler for POST `/appointments/{appointment_id}/confirm`.
async fn handle_confirm_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling confirm_booking request");
    run_lifecycle(&app_state, appointment_id, req, confirm_booking).await
}

/// Handler for POST `/appointments/{appointment_id}/start`.
async fn handle_start_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling start_booking request");
    run_lifecycle(&app_state, appointment_id, req, start_booking).await
}

/// Handler for POST `/appointments/{appointment_id}/complete`.
async fn handle_complete_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling complete_booking request");
    run_lifecycle(&app_state, appointment_id, req, complete_booking).await
}

/// Handler for POST `/appointments/{appointment_id}/cancel`.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<CancelBookingRequest>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling cancel_booking request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    // Not Send; must not live across an await
    let notifiers: [&dyn LifecycleNotifier; 1] = [app_state.broadcaster.as_ref()];
    Ok(Json(cancel_booking(
        &mut persistence,
        &app_state.config,
        appointment_id,
        &req.body,
        &actor,
        cause,
        &notifiers,
    )?))
}

/// Handler for POST `/appointments/{appointment_id}/services/add`.
async fn handle_add_services(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<ChangeServicesRequest>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling add_services request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(add_services(
        &mut persistence,
        &app_state.config,
        appointment_id,
        &req.body,
        &actor,
        cause,
    )?))
}

/// Handler for POST `/appointments/{appointment_id}/services/remove`.
async fn handle_remove_services(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<ChangeServicesRequest>>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling remove_services request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(remove_services(
        &mut persistence,
        &app_state.config,
        appointment_id,
        &req.body,
        &actor,
        cause,
    )?))
}

/// Handler for POST `/appointments/{appointment_id}/delete`.
async fn handle_delete_appointment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<WriteRequest<NoBody>>,
) -> Result<Json<DeleteAppointmentResponse>, HttpError> {
    info!(actor_id = %req.actor.actor_id, appointment_id, "Handling delete_appointment request");
    let (actor, cause) = authenticate(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_appointment(
        &mut persistence,
        appointment_id,
        &actor,
        cause,
    )?))
}

// ========================================================================
// Audit
// ========================================================================

/// Handler for GET `/audit/timeline`.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<AuditTimelineQuery>,
) -> Result<Json<Vec<AuditEventResponse>>, HttpError> {
    let scope: AuditScope = AuditScope::from_parts(&query.scope, query.record_id);
    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = persistence
        .get_audit_timeline(scope)
        .map_err(translate_persistence_error)?;
    drop(persistence);

    Ok(Json(events.iter().map(audit_event_to_response).collect()))
}

/// Handler for GET `/audit/event/{event_id}`.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let event: AuditEvent = persistence
        .get_audit_event(event_id)
        .map_err(translate_persistence_error)?;
    drop(persistence);

    Ok(Json(audit_event_to_response(&event)))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/capabilities", get(handle_global_capabilities))
        .route(
            "/schedules",
            get(handle_list_schedules).post(handle_create_schedule),
        )
        .route("/schedules/{schedule_id}", get(handle_get_schedule))
        .route(
            "/schedules/{schedule_id}/staff",
            post(handle_replace_schedule_staff),
        )
        .route(
            "/schedules/{schedule_id}/deactivate",
            post(handle_deactivate_schedule),
        )
        .route(
            "/schedules/{schedule_id}/reactivate",
            post(handle_reactivate_schedule),
        )
        .route(
            "/schedules/{schedule_id}/delete",
            post(handle_delete_schedule),
        )
        .route(
            "/schedules/{schedule_id}/availability",
            get(handle_get_availability),
        )
        .route(
            "/services",
            get(handle_list_services).post(handle_register_service),
        )
        .route(
            "/services/{service_id}/active",
            post(handle_set_service_active),
        )
        .route("/clients", post(handle_register_client))
        .route("/clients/{client_id}", get(handle_get_client))
        .route(
            "/appointments",
            get(handle_list_appointments).post(handle_create_booking),
        )
        .route(
            "/appointments/{appointment_id}",
            get(handle_get_appointment),
        )
        .route(
            "/appointments/{appointment_id}/history",
            get(handle_get_appointment_history),
        )
        .route(
            "/appointments/{appointment_id}/capabilities",
            get(handle_get_appointment_capabilities),
        )
        .route(
            "/appointments/{appointment_id}/confirm",
            post(handle_confirm_booking),
        )
        .route(
            "/appointments/{appointment_id}/start",
            post(handle_start_booking),
        )
        .route(
            "/appointments/{appointment_id}/complete",
            post(handle_complete_booking),
        )
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handle_cancel_booking),
        )
        .route(
            "/appointments/{appointment_id}/services/add",
            post(handle_add_services),
        )
        .route(
            "/appointments/{appointment_id}/services/remove",
            post(handle_remove_services),
        )
        .route(
            "/appointments/{appointment_id}/delete",
            post(handle_delete_appointment),
        )
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        sqlite = sqlite_library_version(),
        "Initializing Agenda Server"
    );

    let config: BookingConfig =
        BookingConfig::new(&args.timezone, args.slot_length, args.strict_completion)?;
    info!(
        timezone = %args.timezone,
        slot_length = args.slot_length,
        strict_completion = args.strict_completion,
        "Booking rules loaded"
    );

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: Arc::new(config),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
