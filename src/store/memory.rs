use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::model::leave_request::{
    LeaveRequest, LeaveRequestWithOwner, LeaveStatus, LeaveType,
};
use crate::model::user::{LeaveBalances, NewUser, User};

use super::{NewLeaveRequest, Store, StoreError};

/// In-memory `Store` used by the test suite. A single async mutex
/// serializes every operation, which gives the same atomicity the MySQL
/// implementation gets from transactions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<u64, User>,
    balances: HashMap<(u64, LeaveType), i64>,
    requests: BTreeMap<u64, LeaveRequest>,
    next_user_id: u64,
    next_request_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(
        &self,
        user: NewUser,
        balances: LeaveBalances,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.users.insert(
            id,
            User {
                id,
                name: user.name,
                email: user.email,
                department: user.department,
                joining_date: user.joining_date,
                password: user.password,
                role_id: user.role_id,
            },
        );
        for leave_type in [LeaveType::Annual, LeaveType::Sick, LeaveType::Casual] {
            inner
                .balances
                .insert((id, leave_type), balances.get(leave_type));
        }
        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn list_employees(&self) -> Result<Vec<(User, LeaveBalances)>, StoreError> {
        let inner = self.inner.lock().await;
        let mut employees: Vec<(User, LeaveBalances)> = inner
            .users
            .values()
            .map(|user| (user.clone(), collect_balances(&inner, user.id)))
            .collect();
        employees.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn balances(&self, user_id: u64) -> Result<LeaveBalances, StoreError> {
        let inner = self.inner.lock().await;
        Ok(collect_balances(&inner, user_id))
    }

    async fn touch_last_login(&self, _user_id: u64) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_leave_request(
        &self,
        req: NewLeaveRequest,
    ) -> Result<LeaveRequest, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_request_id += 1;
        let id = inner.next_request_id;
        let request = LeaveRequest {
            id,
            user_id: req.user_id,
            leave_type: req.leave_type,
            start_date: req.start_date,
            end_date: req.end_date,
            days: req.days,
            reason: req.reason,
            status: LeaveStatus::Pending,
            decision_by: None,
            decision_note: None,
            created_at: Utc::now(),
        };
        inner.requests.insert(id, request.clone());
        Ok(request)
    }

    async fn find_leave_request(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.requests.get(&id).cloned())
    }

    async fn list_leave_requests_for_user(
        &self,
        user_id: u64,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let inner = self.inner.lock().await;
        let mut requests: Vec<LeaveRequest> = inner
            .requests
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(requests)
    }

    async fn list_leave_requests(
        &self,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequestWithOwner>, StoreError> {
        let inner = self.inner.lock().await;
        let mut requests: Vec<LeaveRequestWithOwner> = inner
            .requests
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .map(|r| LeaveRequestWithOwner {
                request: r.clone(),
                user_name: inner
                    .users
                    .get(&r.user_id)
                    .map(|u| u.name.clone())
                    .unwrap_or_default(),
            })
            .collect();
        requests.sort_by(|a, b| {
            b.request
                .created_at
                .cmp(&a.request.created_at)
                .then(b.request.id.cmp(&a.request.id))
        });
        Ok(requests)
    }

    async fn approve_leave_request(
        &self,
        id: u64,
        decided_by: u64,
        note: Option<String>,
    ) -> Result<LeaveRequest, StoreError> {
        let mut inner = self.inner.lock().await;

        let (user_id, leave_type, days) = {
            let request = inner.requests.get(&id).ok_or(StoreError::NotFound)?;
            if request.status != LeaveStatus::Pending {
                return Err(StoreError::AlreadyDecided);
            }
            (request.user_id, request.leave_type, request.days)
        };

        let balance = inner
            .balances
            .get(&(user_id, leave_type))
            .copied()
            .unwrap_or(0);
        if balance < days {
            return Err(StoreError::InsufficientBalance);
        }

        inner.balances.insert((user_id, leave_type), balance - days);
        let request = inner.requests.get_mut(&id).ok_or(StoreError::NotFound)?;
        request.status = LeaveStatus::Approved;
        request.decision_by = Some(decided_by);
        request.decision_note = note;
        Ok(request.clone())
    }

    async fn reject_leave_request(
        &self,
        id: u64,
        decided_by: u64,
        note: Option<String>,
    ) -> Result<LeaveRequest, StoreError> {
        let mut inner = self.inner.lock().await;
        let request = inner.requests.get_mut(&id).ok_or(StoreError::NotFound)?;
        if request.status != LeaveStatus::Pending {
            return Err(StoreError::AlreadyDecided);
        }
        request.status = LeaveStatus::Rejected;
        request.decision_by = Some(decided_by);
        request.decision_note = note;
        Ok(request.clone())
    }

    async fn delete_pending_leave_request(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.requests.get(&id) {
            None => Err(StoreError::NotFound),
            Some(r) if r.status != LeaveStatus::Pending => Err(StoreError::AlreadyDecided),
            Some(_) => {
                inner.requests.remove(&id);
                Ok(())
            }
        }
    }
}

fn collect_balances(inner: &Inner, user_id: u64) -> LeaveBalances {
    let mut balances = LeaveBalances::default();
    for leave_type in [LeaveType::Annual, LeaveType::Sick, LeaveType::Casual] {
        balances.set(
            leave_type,
            inner
                .balances
                .get(&(user_id, leave_type))
                .copied()
                .unwrap_or(0),
        );
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".into(),
            email: email.into(),
            department: "QA".into(),
            joining_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            password: "hash".into(),
            role_id: 2,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_user(new_user("a@b.com"), LeaveBalances::default_grant())
            .await
            .unwrap();
        let err = store
            .insert_user(new_user("a@b.com"), LeaveBalances::default_grant())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn balances_round_trip() {
        let store = MemoryStore::new();
        let id = store
            .insert_user(new_user("a@b.com"), LeaveBalances::default_grant())
            .await
            .unwrap();
        assert_eq!(store.balances(id).await.unwrap(), LeaveBalances::default_grant());
    }
}
