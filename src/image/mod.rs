//! Image encoding: local files to data URLs and back.

mod encoded;
mod encoder;
mod format;

pub use encoded::{decode, encode_bytes, DecodedPayload, EncodedImage, MimeType};
pub use encoder::encode_file;
pub use format::{ImageFormat, OCTET_STREAM};
