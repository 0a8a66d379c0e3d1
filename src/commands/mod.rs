pub mod inventory;
pub mod slack;
pub mod summarize;
