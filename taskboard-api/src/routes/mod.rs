/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: registration, login and account management
/// - `projects`: projects and their members
/// - `tasks`: tasks and status changes

pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
