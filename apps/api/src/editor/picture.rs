use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PictureError {
    #[error("Please select an image file")]
    NotAnImage,

    #[error("File size must be less than 5MB")]
    TooLarge { size: usize },

    #[error("No file was uploaded")]
    Missing,
}

/// Validates an uploaded profile picture and turns it into a `data:` URL.
pub fn encode_profile_picture(content_type: Option<&str>, bytes: &[u8]) -> Result<String, PictureError> {
    let mime = content_type
        .map(str::trim)
        .filter(|m| m.starts_with("image/"))
        .ok_or(PictureError::NotAnImage)?;

    if bytes.is_empty() {
        return Err(PictureError::Missing);
    }
    if bytes.len() > MAX_PICTURE_BYTES {
        return Err(PictureError::TooLarge { size: bytes.len() });
    }

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_becomes_data_url() {
        let url = encode_profile_picture(Some("image/png"), b"\x89PNG").unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_rejects_non_image() {
        assert_eq!(
            encode_profile_picture(Some("application/pdf"), b"%PDF"),
            Err(PictureError::NotAnImage)
        );
        assert_eq!(encode_profile_picture(None, b"abc"), Err(PictureError::NotAnImage));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let at_limit = vec![0u8; MAX_PICTURE_BYTES];
        assert!(encode_profile_picture(Some("image/jpeg"), &at_limit).is_ok());

        let over = vec![0u8; MAX_PICTURE_BYTES + 1];
        assert_eq!(
            encode_profile_picture(Some("image/jpeg"), &over),
            Err(PictureError::TooLarge {
                size: MAX_PICTURE_BYTES + 1
            })
        );
    }

    #[test]
    fn test_empty_upload_is_missing() {
        assert_eq!(encode_profile_picture(Some("image/gif"), b""), Err(PictureError::Missing));
    }
}
