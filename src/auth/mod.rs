pub mod handlers;
pub mod login;
pub mod password;
