pub mod classroom_client;
pub mod course_resolver;
pub mod enrollment_service;
pub mod google_auth;

#[cfg(test)]
pub mod testing;

pub use classroom_client::*;
pub use course_resolver::*;
