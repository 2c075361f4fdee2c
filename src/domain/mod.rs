// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod budget;
pub mod errors;
pub mod policy;
pub mod repositories;
pub mod user;
pub mod validation;
