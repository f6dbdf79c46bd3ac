pub mod assignment;
pub mod submission;
