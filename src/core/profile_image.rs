use crate::domain::model::ImageRef;
use crate::utils::error::{MyPageError, Result};
use crate::utils::validation::validate_file_extensions;
use std::path::Path;
use url::Url;

pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif"];

/// Schemes a picker may hand back directly instead of a local path.
const PASSTHROUGH_SCHEMES: [&str; 5] = ["http", "https", "file", "blob", "data"];

/// Turns whatever the file picker produced into a stored image reference.
///
/// URLs with a known scheme are kept verbatim and `scheme://` URLs with any
/// other scheme are refused. Everything else, `my:photo.png` included, is
/// treated as a local path, checked for an image extension and stored as a
/// `file://` URL.
pub fn resolve_image_ref(selected: &str) -> Result<ImageRef> {
    // single-letter schemes are Windows drive letters, not URLs
    if let Some(url) = Url::parse(selected)
        .ok()
        .filter(|url| url.scheme().len() > 1)
    {
        if PASSTHROUGH_SCHEMES.contains(&url.scheme()) {
            return Ok(ImageRef(url.to_string()));
        }
        if selected.contains("://") {
            return Err(MyPageError::InvalidImage {
                path: selected.to_string(),
                reason: format!("unsupported URL scheme: {}", url.scheme()),
            });
        }
    }

    let path = Path::new(selected);
    validate_file_extensions("profile_image", &[path], &IMAGE_EXTENSIONS).map_err(|e| {
        MyPageError::InvalidImage {
            path: selected.to_string(),
            reason: match e {
                MyPageError::InvalidConfigValueError { reason, .. } => reason,
                other => other.to_string(),
            },
        }
    })?;

    let absolute = std::path::absolute(path)?;
    let url = Url::from_file_path(&absolute).map_err(|_| MyPageError::InvalidImage {
        path: selected.to_string(),
        reason: "path cannot be expressed as a file URL".to_string(),
    })?;

    Ok(ImageRef(url.to_string()))
}
