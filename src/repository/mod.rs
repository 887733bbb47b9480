//! Database repository layer

pub mod course_repo;
pub mod department_repo;
pub mod syllabus_repo;
pub mod user_repo;

pub use course_repo::*;
pub use department_repo::*;
pub use syllabus_repo::*;
pub use user_repo::*;
