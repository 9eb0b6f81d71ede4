pub mod dashboard;
pub mod health;
pub mod layout;
pub mod workflow;
