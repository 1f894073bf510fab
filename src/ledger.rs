//! Leave ledger: owns the request lifecycle (submit, decide, cancel) and the
//! balance accounting. Balances are deducted on approval, never on
//! submission; submission only checks that the balance covers the range.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::leave_request::{
    LeaveDecision, LeaveRequest, LeaveRequestWithOwner, LeaveStatus, LeaveType,
    inclusive_day_count,
};
use crate::model::user::LeaveBalances;
use crate::policy;
use crate::store::{NewLeaveRequest, Store, StoreError};

pub struct LeaveLedger {
    store: Arc<dyn Store>,
}

impl LeaveLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// File a new request. The day count is always computed here from the
    /// date range; a client-supplied count is never trusted.
    pub async fn submit(
        &self,
        actor: &AuthUser,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> Result<LeaveRequest, AppError> {
        if !policy::can_create_leave_request(actor.role) {
            return Err(AppError::Forbidden);
        }

        if start_date > end_date {
            return Err(AppError::Validation(
                "startDate cannot be after endDate".into(),
            ));
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("reason must not be empty".into()));
        }

        let user = self
            .store
            .find_user_by_id(actor.user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        if start_date < user.joining_date {
            return Err(AppError::Validation(
                "startDate cannot predate the joining date".into(),
            ));
        }

        let days = inclusive_day_count(start_date, end_date);

        let balances = self.store.balances(actor.user_id).await?;
        if days > balances.get(leave_type) {
            return Err(AppError::InsufficientBalance);
        }

        let request = self
            .store
            .insert_leave_request(NewLeaveRequest {
                user_id: actor.user_id,
                leave_type,
                start_date,
                end_date,
                days,
                reason: reason.to_owned(),
            })
            .await?;

        info!(
            request_id = request.id,
            user_id = actor.user_id,
            email = %actor.email,
            leave_type = %leave_type,
            days,
            "Leave request submitted"
        );
        Ok(request)
    }

    /// Decide a PENDING request. Approval deducts the balance atomically in
    /// the store; re-deciding an already decided request is rejected, never
    /// silently absorbed.
    pub async fn decide(
        &self,
        actor: &AuthUser,
        request_id: u64,
        decision: LeaveDecision,
        note: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        if !policy::can_decide_leave_request(actor.role) {
            return Err(AppError::Forbidden);
        }

        let result = match decision {
            LeaveDecision::Approved => {
                self.store
                    .approve_leave_request(request_id, actor.user_id, note)
                    .await
            }
            LeaveDecision::Rejected => {
                self.store
                    .reject_leave_request(request_id, actor.user_id, note)
                    .await
            }
        };

        match result {
            Ok(request) => {
                info!(
                    request_id,
                    decided_by = actor.user_id,
                    decision = %decision,
                    "Leave request decided"
                );
                Ok(request)
            }
            Err(StoreError::NotFound) => Err(AppError::NotFound("leave request")),
            Err(e) => Err(e.into()),
        }
    }

    /// Owner-only cancellation of a still-PENDING request. No balance effect
    /// (nothing was deducted yet).
    pub async fn cancel(&self, actor: &AuthUser, request_id: u64) -> Result<(), AppError> {
        let request = self
            .store
            .find_leave_request(request_id)
            .await?
            .ok_or(AppError::NotFound("leave request"))?;

        if request.user_id != actor.user_id {
            return Err(AppError::Forbidden);
        }
        if request.status != LeaveStatus::Pending {
            return Err(AppError::InvalidTransition);
        }

        match self.store.delete_pending_leave_request(request_id).await {
            Ok(()) => {
                info!(request_id, user_id = actor.user_id, "Leave request cancelled");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(AppError::NotFound("leave request")),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(
        &self,
        actor: &AuthUser,
        request_id: u64,
    ) -> Result<LeaveRequest, AppError> {
        let request = self
            .store
            .find_leave_request(request_id)
            .await?
            .ok_or(AppError::NotFound("leave request"))?;

        if !policy::can_view_leave_request(actor.role, actor.user_id, request.user_id) {
            return Err(AppError::Forbidden);
        }
        Ok(request)
    }

    pub async fn list_for_user(
        &self,
        actor: &AuthUser,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        Ok(self
            .store
            .list_leave_requests_for_user(actor.user_id, status)
            .await?)
    }

    /// Admin-only listing of every request, enriched with owner names.
    pub async fn list_all(
        &self,
        actor: &AuthUser,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequestWithOwner>, AppError> {
        if !policy::can_view_all_leave_requests(actor.role) {
            return Err(AppError::Forbidden);
        }
        Ok(self.store.list_leave_requests(status).await?)
    }

    pub async fn balances(&self, actor: &AuthUser) -> Result<LeaveBalances, AppError> {
        Ok(self.store.balances(actor.user_id).await?)
    }
}
