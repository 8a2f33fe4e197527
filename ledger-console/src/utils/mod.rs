pub mod amount;
pub mod idempotency;
pub mod jwt;

pub use idempotency::{IdempotencyKey, IDEMPOTENCY_KEY_HEADER};
pub use jwt::decode_identity;
