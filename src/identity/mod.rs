pub mod decoder;
pub mod record;

pub use decoder::{decode_cookie, decode_cookie_lenient, DecodeError, LenientDecode};
pub use record::IdentityRecord;
