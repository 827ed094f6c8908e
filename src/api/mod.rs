pub mod health;
pub mod invitations;
pub mod metrics;
pub mod swagger;
