use crate::api::employee::EmployeeResponse;
use crate::api::leave_request::{CreateLeaveRequest, DecideLeaveRequest};
use crate::model::leave_request::{
    LeaveDecision, LeaveRequest, LeaveRequestWithOwner, LeaveStatus, LeaveType,
};
use crate::model::user::LeaveBalances;
use crate::models::{LoginReqDto, LoginResponse, SignupReqDto};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management System API",
        version = "1.0.0",
        description = r#"
## Leave Management System

This API tracks employee leave: submission, balance accounting, and a
role-gated approval workflow.

### 🔹 Key Features
- **Leave Requests**
  - Employees file, list, and cancel their own requests
  - Admins approve or reject pending requests with an optional note
- **Balance Accounting**
  - Per-type balances (annual, sick, casual), deducted on approval
- **Employee Directory**
  - Admin-only listing with remaining balances

### 🔐 Security
Protected endpoints use **JWT Bearer authentication**. Tokens are
short-lived and stateless; decisions require the **Admin** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave_request,
        crate::api::leave_request::decide_leave_request,
        crate::api::leave_request::list_leave_requests,
        crate::api::leave_request::list_my_leave_requests,
        crate::api::leave_request::get_leave_request,
        crate::api::leave_request::cancel_leave_request,

        crate::api::employee::list_employees,
        crate::api::employee::my_leave_balances,
    ),
    components(
        schemas(
            CreateLeaveRequest,
            DecideLeaveRequest,
            LeaveRequest,
            LeaveRequestWithOwner,
            LeaveType,
            LeaveStatus,
            LeaveDecision,
            LeaveBalances,
            EmployeeResponse,
            LoginReqDto,
            SignupReqDto,
            LoginResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Employee", description = "Employee directory and balance APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
