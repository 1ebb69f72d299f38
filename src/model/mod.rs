pub mod department;
pub mod leave_application;
pub mod role;
pub mod staff;
pub mod student;
