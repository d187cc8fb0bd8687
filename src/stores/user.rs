//! Defines the user store trait.

use crate::{
    Error,
    user::{User, UserForm, UserId},
};

/// Creates, retrieves, updates and deletes users.
pub trait UserStore {
    /// Create a new user from `form` and add it to the store.
    fn create(&self, form: UserForm) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::UserNotFound] if no user with `id` exists.
    fn get(&self, id: UserId) -> Result<User, Error>;

    /// Get all users ordered by last name, then first name.
    fn get_all(&self) -> Result<Vec<User>, Error>;

    /// Replace the details of the user `id` with `form`.
    ///
    /// Returns [Error::UserNotFound] if no user with `id` exists.
    fn update(&self, id: UserId, form: UserForm) -> Result<User, Error>;

    /// Delete the user `id`.
    ///
    /// Returns [Error::UserNotFound] if no user with `id` exists, or
    /// [Error::UserHasExpenses] if any expense refers to the user.
    fn delete(&self, id: UserId) -> Result<(), Error>;
}
