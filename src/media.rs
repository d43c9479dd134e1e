//! Profile picture encoding
//!
//! Uploaded images are accepted in exactly two formats (PNG, JPEG) and stored
//! inline as a self-contained `data:` URL so a record carries its own picture.

use crate::error::{QuizzifyError, QuizzifyResult, ValidationErrors};
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

/// Message surfaced when an upload is not PNG or JPEG
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "Only PNG and JPG files are allowed.";

/// Validate an uploaded image and encode it as a `data:` URL
///
/// Returns a `Validation` error carrying [`UNSUPPORTED_FORMAT_MESSAGE`] when
/// the bytes are not recognizably PNG or JPEG.
pub fn encode_profile_picture(bytes: &[u8]) -> QuizzifyResult<String> {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        _ => {
            return Err(QuizzifyError::Validation(ValidationErrors::from_message(
                UNSUPPORTED_FORMAT_MESSAGE,
            )))
        }
    };

    let encoded = general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime, encoded))
}

/// Decode a stored `data:` URL back into raw image bytes
pub fn decode_profile_picture(data_url: &str) -> QuizzifyResult<Vec<u8>> {
    let payload = data_url.split_once(',').map(|(_, p)| p).ok_or_else(|| {
        QuizzifyError::Validation(ValidationErrors::from_message(
            "Malformed profile picture data URL.",
        ))
    })?;
    Ok(general_purpose::STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Magic headers are enough for format detection
    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n0000";
    const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe00000";

    #[test]
    fn test_png_encodes_as_data_url() {
        let url = encode_profile_picture(PNG_BYTES).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_jpeg_encodes_as_data_url() {
        let url = encode_profile_picture(JPEG_BYTES).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_other_formats_rejected() {
        // GIF magic bytes
        let err = encode_profile_picture(b"GIF89a0000").unwrap_err();
        match err {
            QuizzifyError::Validation(errors) => {
                assert_eq!(errors.messages(), &[UNSUPPORTED_FORMAT_MESSAGE]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_round_trip() {
        let url = encode_profile_picture(PNG_BYTES).unwrap();
        let bytes = decode_profile_picture(&url).unwrap();
        assert_eq!(bytes, PNG_BYTES);
    }

    #[test]
    fn test_malformed_data_url_rejected() {
        assert!(decode_profile_picture("no-comma-here").is_err());
    }
}
