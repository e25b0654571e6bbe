pub mod admin;
pub mod auth;
pub mod messages;
pub mod middleware;
pub mod payments;
pub mod render;
pub mod reviews;
pub mod routes;
pub mod session;
pub mod state;
pub mod uploads;
