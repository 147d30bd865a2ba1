pub mod labels;
pub mod projects;
pub mod users;
