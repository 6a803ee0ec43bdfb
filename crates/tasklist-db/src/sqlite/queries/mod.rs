pub mod attachments;
pub mod tasks;
