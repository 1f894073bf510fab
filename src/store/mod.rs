//! Record-store seam. The ledger and handlers only see the `Store` trait;
//! `MySqlStore` backs production and `MemoryStore` backs the test suite.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::leave_request::{LeaveRequest, LeaveRequestWithOwner, LeaveStatus, LeaveType};
use crate::model::user::{LeaveBalances, NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[cfg(test)]
pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("leave request already decided")]
    AlreadyDecided,
    #[error("insufficient leave balance")]
    InsufficientBalance,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub user_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(
        &self,
        user: NewUser,
        balances: LeaveBalances,
    ) -> Result<u64, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;
    async fn list_employees(&self) -> Result<Vec<(User, LeaveBalances)>, StoreError>;
    async fn balances(&self, user_id: u64) -> Result<LeaveBalances, StoreError>;
    async fn touch_last_login(&self, user_id: u64) -> Result<(), StoreError>;

    async fn insert_leave_request(
        &self,
        req: NewLeaveRequest,
    ) -> Result<LeaveRequest, StoreError>;
    async fn find_leave_request(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;
    async fn list_leave_requests_for_user(
        &self,
        user_id: u64,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn list_leave_requests(
        &self,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequestWithOwner>, StoreError>;

    /// Atomic PENDING -> APPROVED transition: flips the status, records the
    /// decision, and deducts the request's days from the matching balance in
    /// one read-modify-write. Fails with `InsufficientBalance` (and leaves
    /// the request PENDING) if the balance no longer covers the days.
    async fn approve_leave_request(
        &self,
        id: u64,
        decided_by: u64,
        note: Option<String>,
    ) -> Result<LeaveRequest, StoreError>;

    /// Atomic PENDING -> REJECTED transition; balances are never touched.
    async fn reject_leave_request(
        &self,
        id: u64,
        decided_by: u64,
        note: Option<String>,
    ) -> Result<LeaveRequest, StoreError>;

    /// Owner cancellation: removes the request while it is still PENDING.
    async fn delete_pending_leave_request(&self, id: u64) -> Result<(), StoreError>;
}
