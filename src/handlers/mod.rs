pub mod admin;
pub mod jobs;
pub mod session;
pub mod test_routes;
pub mod vendors;
