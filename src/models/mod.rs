pub use assignment::{Assignment, AssignmentWithSubmissions};
pub use course::Course;
pub use submission::{Submission, SubmissionView};

mod assignment;
mod course;
mod submission;
