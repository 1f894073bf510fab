//! Pure role-policy predicates. Total over the `Role` enum on purpose:
//! every arm is spelled out so adding a role forces a decision here.

use crate::model::role::Role;

/// Only employees file leave requests for themselves; an admin does not
/// file on their own behalf.
pub fn can_create_leave_request(role: Role) -> bool {
    match role {
        Role::Employee => true,
        Role::Admin => false,
    }
}

pub fn can_decide_leave_request(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Employee => false,
    }
}

pub fn can_view_all_leave_requests(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Employee => false,
    }
}

pub fn can_manage_employees(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Employee => false,
    }
}

/// Admins see everything; an employee only their own records.
pub fn can_view_leave_request(role: Role, actor_id: u64, owner_id: u64) -> bool {
    can_view_all_leave_requests(role) || actor_id == owner_id
}
