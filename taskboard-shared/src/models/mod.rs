/// Database models for Taskboard
///
/// Each model carries its own SQL as associated functions taking a
/// `&PgPool`; [`crate::store::PgStore`] wires them behind the
/// [`crate::store::EntityStore`] trait.
///
/// # Models
///
/// - `user`: accounts with the admin role flag
/// - `project`: projects grouping tasks and members
/// - `membership`: the (project, user) join
/// - `task`: assigned work items and their open status

pub mod membership;
pub mod project;
pub mod task;
pub mod user;
