use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::leave_request::LeaveType;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub joining_date: NaiveDate,
    pub password: String,
    pub role_id: u8,
}

/// Insert payload; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub department: String,
    pub joining_date: NaiveDate,
    pub password: String,
    pub role_id: u8,
}

/// Remaining whole days per leave type. Mutated only by the leave ledger
/// on approval.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalances {
    #[schema(example = 20)]
    pub annual: i64,
    #[schema(example = 10)]
    pub sick: i64,
    #[schema(example = 5)]
    pub casual: i64,
}

impl LeaveBalances {
    /// Grant issued to every employee account at signup.
    pub fn default_grant() -> Self {
        Self {
            annual: 20,
            sick: 10,
            casual: 5,
        }
    }

    pub fn get(&self, leave_type: LeaveType) -> i64 {
        match leave_type {
            LeaveType::Annual => self.annual,
            LeaveType::Sick => self.sick,
            LeaveType::Casual => self.casual,
        }
    }

    pub fn set(&mut self, leave_type: LeaveType, days: i64) {
        match leave_type {
            LeaveType::Annual => self.annual = days,
            LeaveType::Sick => self.sick = days,
            LeaveType::Casual => self.casual = days,
        }
    }
}
