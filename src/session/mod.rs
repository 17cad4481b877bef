pub mod submission;
pub mod wizard;
