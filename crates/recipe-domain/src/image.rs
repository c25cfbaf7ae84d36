//! Storage paths for uploaded recipe images.

use uuid::Uuid;

/// Directory (relative to the media root) holding recipe images.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Longest client file name accepted for an upload.
pub const MAX_IMAGE_FILENAME_LEN: usize = 100;

/// Extensions an uploaded image may carry, compared case-insensitively.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Reasons a client file name is rejected by [`validate_image_filename`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageFilenameError {
    #[error("Ensure this filename has at most 100 characters (it has {len}).")]
    TooLong { len: usize },
    #[error("File extension \"{0}\" is not allowed. Allowed extensions are: jpg, jpeg, png, gif, webp.")]
    ExtensionNotAllowed(String),
}

/// Check the name an image was uploaded under before it is stored.
///
/// The extension decides the content type the file is later served with, so
/// only image extensions pass.
pub fn validate_image_filename(filename: &str) -> Result<(), ImageFilenameError> {
    let len = filename.chars().count();
    if len > MAX_IMAGE_FILENAME_LEN {
        return Err(ImageFilenameError::TooLong { len });
    }
    let ext = extension_of(filename).trim_start_matches('.');
    if ALLOWED_IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    {
        Ok(())
    } else {
        Err(ImageFilenameError::ExtensionNotAllowed(ext.to_lowercase()))
    }
}

/// Generate a collision-free storage path for an uploaded recipe image.
///
/// The original file name is discarded; only its extension survives.
pub fn recipe_image_file_path(filename: &str) -> String {
    recipe_image_file_path_with(Uuid::new_v4(), filename)
}

/// Deterministic core of [`recipe_image_file_path`].
///
/// Produces `uploads/recipe/<uuid><ext>` where `<ext>` includes the leading dot,
/// or is empty when the file name has no extension.
pub fn recipe_image_file_path_with(id: Uuid, filename: &str) -> String {
    format!("{RECIPE_IMAGE_DIR}/{id}{}", extension_of(filename))
}

fn extension_of(filename: &str) -> &str {
    // Only the final path component counts, and a leading dot is not an extension.
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(idx) if idx > 0 && name[..idx].chars().any(|c| c != '.') => &name[idx..],
        _ => "",
    }
}
