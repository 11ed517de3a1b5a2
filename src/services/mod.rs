// Services module - Business logic

pub mod analytics;
pub mod password;
pub mod payment_request;
pub mod qr;
pub mod reconciliation;
pub mod rotation;
