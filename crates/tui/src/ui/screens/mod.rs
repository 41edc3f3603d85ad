pub mod budgets;
pub mod entries;
pub mod login;
pub mod notifications;
pub mod overview;
pub mod summary;
