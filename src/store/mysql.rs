use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::model::leave_request::{LeaveRequest, LeaveRequestWithOwner, LeaveStatus, LeaveType};
use crate::model::user::{LeaveBalances, NewUser, User};

use super::{NewLeaveRequest, Store, StoreError};

const USER_COLUMNS: &str = "id, name, email, department, joining_date, password, role_id";
const LEAVE_COLUMNS: &str = "id, user_id, leave_type, start_date, end_date, days, reason, status, \
                             decision_by, decision_note, created_at";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_request(
        &self,
        id: u64,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
        let request = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(request)
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn insert_user(
        &self,
        user: NewUser,
        balances: LeaveBalances,
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, department, joining_date, password, role_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.department)
        .bind(user.joining_date)
        .bind(&user.password)
        .bind(user.role_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return StoreError::DuplicateEmail;
                }
            }
            StoreError::Database(e)
        })?;

        let user_id = result.last_insert_id();

        for leave_type in [LeaveType::Annual, LeaveType::Sick, LeaveType::Casual] {
            sqlx::query(
                r#"
                INSERT INTO leave_balances (user_id, leave_type, balance_days)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(leave_type)
            .bind(balances.get(leave_type))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(user_id)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_employees(&self) -> Result<Vec<(User, LeaveBalances)>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;

        let rows = sqlx::query_as::<_, (u64, LeaveType, i64)>(
            "SELECT user_id, leave_type, balance_days FROM leave_balances",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_user: HashMap<u64, LeaveBalances> = HashMap::new();
        for (user_id, leave_type, days) in rows {
            by_user.entry(user_id).or_default().set(leave_type, days);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let balances = by_user.get(&user.id).copied().unwrap_or_default();
                (user, balances)
            })
            .collect())
    }

    async fn balances(&self, user_id: u64) -> Result<LeaveBalances, StoreError> {
        let rows = sqlx::query_as::<_, (LeaveType, i64)>(
            "SELECT leave_type, balance_days FROM leave_balances WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut balances = LeaveBalances::default();
        for (leave_type, days) in rows {
            balances.set(leave_type, days);
        }
        Ok(balances)
    }

    async fn touch_last_login(&self, user_id: u64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_leave_request(
        &self,
        req: NewLeaveRequest,
    ) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests (user_id, leave_type, start_date, end_date, days, reason, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.user_id)
        .bind(req.leave_type)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.days)
        .bind(&req.reason)
        .bind(LeaveStatus::Pending)
        .execute(&self.pool)
        .await?;

        self.fetch_request(result.last_insert_id())
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn find_leave_request(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        self.fetch_request(id).await
    }

    async fn list_leave_requests_for_user(
        &self,
        user_id: u64,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let mut sql =
            format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE user_id = ?");
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, LeaveRequest>(&sql).bind(user_id);
        if let Some(status) = status {
            query = query.bind(status);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn list_leave_requests(
        &self,
        status: Option<LeaveStatus>,
    ) -> Result<Vec<LeaveRequestWithOwner>, StoreError> {
        let mut sql = String::from(
            "SELECT lr.id, lr.user_id, lr.leave_type, lr.start_date, lr.end_date, lr.days, \
             lr.reason, lr.status, lr.decision_by, lr.decision_note, lr.created_at, \
             u.name AS user_name \
             FROM leave_requests lr JOIN users u ON u.id = lr.user_id",
        );
        if status.is_some() {
            sql.push_str(" WHERE lr.status = ?");
        }
        sql.push_str(" ORDER BY lr.created_at DESC");

        let mut query = sqlx::query_as::<_, LeaveRequestWithOwner>(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn approve_leave_request(
        &self,
        id: u64,
        decided_by: u64,
        note: Option<String>,
    ) -> Result<LeaveRequest, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so concurrent decisions serialize here.
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ? FOR UPDATE");
        let request = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        if request.status != LeaveStatus::Pending {
            return Err(StoreError::AlreadyDecided);
        }

        // Conditional deduction: fails cleanly if another approval drained
        // the balance since submission.
        let deducted = sqlx::query(
            r#"
            UPDATE leave_balances
            SET balance_days = balance_days - ?
            WHERE user_id = ? AND leave_type = ? AND balance_days >= ?
            "#,
        )
        .bind(request.days)
        .bind(request.user_id)
        .bind(request.leave_type)
        .bind(request.days)
        .execute(&mut *tx)
        .await?;

        if deducted.rows_affected() == 0 {
            // Dropping the transaction rolls it back; the request stays PENDING.
            return Err(StoreError::InsufficientBalance);
        }

        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, decision_by = ?, decision_note = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(LeaveStatus::Approved)
        .bind(decided_by)
        .bind(&note)
        .bind(id)
        .bind(LeaveStatus::Pending)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.fetch_request(id).await?.ok_or(StoreError::NotFound)
    }

    async fn reject_leave_request(
        &self,
        id: u64,
        decided_by: u64,
        note: Option<String>,
    ) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, decision_by = ?, decision_note = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(LeaveStatus::Rejected)
        .bind(decided_by)
        .bind(&note)
        .bind(id)
        .bind(LeaveStatus::Pending)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.fetch_request(id).await? {
                Some(_) => Err(StoreError::AlreadyDecided),
                None => Err(StoreError::NotFound),
            };
        }

        self.fetch_request(id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete_pending_leave_request(&self, id: u64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ? AND status = ?")
            .bind(id)
            .bind(LeaveStatus::Pending)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return match self.fetch_request(id).await? {
                Some(_) => Err(StoreError::AlreadyDecided),
                None => Err(StoreError::NotFound),
            };
        }
        Ok(())
    }
}
