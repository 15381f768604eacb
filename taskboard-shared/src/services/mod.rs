/// Business operations over an [`EntityStore`](crate::store::EntityStore)
///
/// Every function takes the store as `&dyn EntityStore` and, where the
/// outcome depends on who is asking, the caller's
/// [`AuthContext`](crate::auth::middleware::AuthContext). Failures are
/// [`ServiceError`](crate::error::ServiceError) values; nothing is retried
/// and no operation leaves a partial write behind.
///
/// # Modules
///
/// - [`tasks`]: task creation and the status lifecycle
/// - [`membership`]: adding and removing project members
/// - [`projects`]: projects with their member lists
/// - [`users`]: registration, login and profiles

pub mod membership;
pub mod projects;
pub mod tasks;
pub mod users;
