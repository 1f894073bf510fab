use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::ledger::LeaveLedger;
use crate::model::user::LeaveBalances;
use crate::store::Store;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2023-01-01", format = "date", value_type = String)]
    pub joining_date: NaiveDate,
    pub leave_balances: LeaveBalances,
}

/* =========================
Employee directory (Admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees with their leave balances", body = [EmployeeResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let employees: Vec<EmployeeResponse> = store
        .list_employees()
        .await?
        .into_iter()
        .map(|(user, balances)| EmployeeResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            department: user.department,
            joining_date: user.joining_date,
            leave_balances: balances,
        })
        .collect();

    Ok(HttpResponse::Ok().json(employees))
}

/* =========================
Own leave balances
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-balance",
    responses(
        (status = 200, description = "The caller's remaining balances", body = LeaveBalances),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn my_leave_balances(
    auth: AuthUser,
    ledger: web::Data<LeaveLedger>,
) -> Result<HttpResponse, AppError> {
    let balances = ledger.balances(&auth).await?;
    Ok(HttpResponse::Ok().json(balances))
}
