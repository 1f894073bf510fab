use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::ledger::LeaveLedger;
use crate::model::leave_request::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    #[schema(example = "ANNUAL")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideLeaveRequest {
    #[schema(example = "APPROVED")]
    pub decision: LeaveDecision,
    #[schema(example = "Enjoy your trip")]
    pub decision_note: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveStatusFilter {
    /// Filter by leave status
    #[param(example = "PENDING")]
    pub status: Option<LeaveStatus>,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body(
        content = CreateLeaveRequest,
        description = "Leave request payload; the day count is derived server-side",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "leaveRequest": { "id": 1, "status": "PENDING", "days": 3 }
        })),
        (status = 400, description = "Bad dates or empty reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Insufficient leave balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave_request(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
    payload: web::Json<CreateLeaveRequest>,
) -> Result<HttpResponse, AppError> {
    let request = ledger
        .submit(
            &auth,
            payload.leave_type,
            payload.start_date,
            payload.end_date,
            &payload.reason,
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave request submitted",
        "leaveRequest": request
    })))
}

/* =========================
Decide leave request (Admin)
========================= */
#[utoipa::path(
    patch,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "ID of the leave request to decide")),
    request_body = DecideLeaveRequest,
    responses(
        (status = 200, description = "Leave request decided", body = Object, example = json!({
            "message": "Leave request updated",
            "leaveRequest": { "id": 1, "status": "APPROVED" }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided or insufficient balance")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn decide_leave_request(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeaveRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let request = ledger
        .decide(&auth, path.into_inner(), payload.decision, payload.decision_note)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request updated",
        "leaveRequest": request
    })))
}

/* =========================
List all leave requests (Admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    params(LeaveStatusFilter),
    responses(
        (status = 200, description = "All leave requests with owner names"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leave_requests(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
    query: web::Query<LeaveStatusFilter>,
) -> Result<HttpResponse, AppError> {
    let requests = ledger.list_all(&auth, query.status).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/* =========================
List own leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/mine",
    params(LeaveStatusFilter),
    responses(
        (status = 200, description = "The caller's leave requests"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_my_leave_requests(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
    query: web::Query<LeaveStatusFilter>,
) -> Result<HttpResponse, AppError> {
    let requests = ledger.list_for_user(&auth, query.status).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/* =========================
Fetch one leave request
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave_request(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let request = ledger.get(&auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Cancel own pending leave request
========================= */
#[utoipa::path(
    delete,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "ID of the leave request to cancel")),
    responses(
        (status = 204, description = "Leave request cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave_request(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    ledger.cancel(&auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
