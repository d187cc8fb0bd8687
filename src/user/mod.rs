//! User management: the user model and its REST endpoints.

mod create;
mod delete;
mod domain;
mod edit;
mod get;

pub use create::create_user_endpoint;
pub use delete::delete_user_endpoint;
pub use domain::{User, UserDetails, UserForm, UserId, UserSummary, default_monthly_quota};
pub use edit::update_user_endpoint;
pub use get::{get_user_endpoint, get_users_endpoint};

pub(crate) use domain::map_row_to_user;
