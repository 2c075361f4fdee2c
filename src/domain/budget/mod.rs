// Budget domain module
// Contains the budget aggregate root, its audit trail and value objects

#![allow(clippy::module_inception)]

pub mod budget;
pub mod history;
pub mod validation;
pub mod value_objects;

// Re-export main types for convenience
pub use budget::{Budget, BudgetChanges, BudgetDraft, BudgetRevision};
pub use history::ChangeRecord;
pub use validation::BudgetPayload;
pub use value_objects::{BudgetField, BudgetNumber, BudgetStatus, Money};
