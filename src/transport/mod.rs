//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod broadcast;

pub use broadcast::{ApiErrorBody, ApiErrorDetail, decode_error_body, encode_broadcast_body};
