// User domain module
// Members of the organization, their roles and provisioning rules

#![allow(clippy::module_inception)]

pub mod user;
pub mod validation;
pub mod value_objects;

pub use user::User;
pub use value_objects::{Email, Gender, Role};
