// Models module - Database entity representations

pub mod admin_user;
pub mod payment_address;
pub mod transaction;

pub use admin_user::{AdminRole, AdminUser};
pub use payment_address::PaymentAddress;
pub use transaction::{Transaction, TransactionStatus};
