/// Authorization checks
///
/// Two kinds of rule live here:
///
/// 1. **Role checks** on the caller's [`AuthContext`]: [`require_admin`]
///    and [`require_self_or_admin`]
/// 2. **The task status policy**, [`authorize_status_change`], a pure
///    function over the task's assignee and assigner, the requested status
///    and the caller
///
/// # Status policy
///
/// Evaluated in order, first match wins:
///
/// | # | Condition                                   | Outcome                |
/// |---|---------------------------------------------|------------------------|
/// | 1 | status is `Done`, caller is not the assigner | [`AuthzError::DoneReservedToAssigner`] |
/// | 2 | caller is the assignee, status is not `Done` | allowed                |
/// | 3 | status is `Done`, caller is the assigner     | allowed                |
/// | 4 | anything else                                | [`AuthzError::NotAssignee`] |
///
/// An assignee who is not also the assigner cannot close the task. An
/// assigner who is not also the assignee can only close it.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::authorization::authorize_status_change;
/// use taskboard_shared::models::task::TaskStatus;
///
/// // Task assigned by user 1 to user 2
/// assert!(authorize_status_change(2, 1, &TaskStatus::new("InProgress"), 2).is_ok());
/// assert!(authorize_status_change(2, 1, &TaskStatus::done(), 2).is_err());
/// assert!(authorize_status_change(2, 1, &TaskStatus::done(), 1).is_ok());
/// ```

use super::middleware::AuthContext;
use crate::models::task::TaskStatus;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Operation requires the admin role
    #[error("Administrator role required")]
    AdminRequired,

    /// Caller may only act on their own account
    #[error("You can only modify your own account")]
    NotSelfOrAdmin,

    /// Only the assigner may close a task
    #[error("Only the admin who assigned the task can mark it Done")]
    DoneReservedToAssigner,

    /// Caller is neither allowed assignee nor assigner
    #[error("This task is not assigned to you")]
    NotAssignee,
}

/// Requires the caller to be an administrator
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.is_admin() {
        return Err(AuthzError::AdminRequired);
    }

    Ok(())
}

/// Requires the caller to be `user_id` or an administrator
pub fn require_self_or_admin(auth: &AuthContext, user_id: i64) -> Result<(), AuthzError> {
    if auth.user_id != user_id && !auth.is_admin() {
        return Err(AuthzError::NotSelfOrAdmin);
    }

    Ok(())
}

/// Decides whether `caller_id` may set a task's status to `requested`
pub fn authorize_status_change(
    assignee_id: i64,
    assigner_id: i64,
    requested: &TaskStatus,
    caller_id: i64,
) -> Result<(), AuthzError> {
    let closing = requested.is_done();

    if closing && caller_id != assigner_id {
        return Err(AuthzError::DoneReservedToAssigner);
    }

    if caller_id == assignee_id && !closing {
        return Ok(());
    }

    if closing && caller_id == assigner_id {
        return Ok(());
    }

    Err(AuthzError::NotAssignee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Role;

    const ASSIGNEE: i64 = 2;
    const ASSIGNER: i64 = 1;
    const STRANGER: i64 = 3;

    fn check(requested: &str, caller: i64) -> Result<(), AuthzError> {
        authorize_status_change(ASSIGNEE, ASSIGNER, &TaskStatus::new(requested), caller)
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&AuthContext::new(1, "root", Role::Admin)).is_ok());
        assert_eq!(
            require_admin(&AuthContext::new(2, "ada", Role::User)),
            Err(AuthzError::AdminRequired)
        );
    }

    #[test]
    fn test_require_self_or_admin() {
        let ada = AuthContext::new(2, "ada", Role::User);
        let root = AuthContext::new(1, "root", Role::Admin);

        assert!(require_self_or_admin(&ada, 2).is_ok());
        assert_eq!(require_self_or_admin(&ada, 3), Err(AuthzError::NotSelfOrAdmin));
        assert!(require_self_or_admin(&root, 3).is_ok());
    }

    #[test]
    fn test_assignee_moves_between_open_statuses() {
        assert!(check("InProgress", ASSIGNEE).is_ok());
        assert!(check("Blocked", ASSIGNEE).is_ok());
        assert!(check("done", ASSIGNEE).is_ok());
    }

    #[test]
    fn test_only_assigner_closes() {
        assert_eq!(check("Done", ASSIGNEE), Err(AuthzError::DoneReservedToAssigner));
        assert_eq!(check("Done", STRANGER), Err(AuthzError::DoneReservedToAssigner));
        assert!(check("Done", ASSIGNER).is_ok());
    }

    #[test]
    fn test_assigner_cannot_set_open_status() {
        assert_eq!(check("InProgress", ASSIGNER), Err(AuthzError::NotAssignee));
    }

    #[test]
    fn test_stranger_rejected() {
        assert_eq!(check("InProgress", STRANGER), Err(AuthzError::NotAssignee));
    }

    #[test]
    fn test_self_assigned_task() {
        // Assigner and assignee are the same user
        assert!(authorize_status_change(4, 4, &TaskStatus::new("InProgress"), 4).is_ok());
        assert!(authorize_status_change(4, 4, &TaskStatus::done(), 4).is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthzError::DoneReservedToAssigner.to_string(),
            "Only the admin who assigned the task can mark it Done"
        );
        assert_eq!(AuthzError::NotAssignee.to_string(), "This task is not assigned to you");
    }
}
