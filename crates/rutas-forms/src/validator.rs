use rutas_core::models::{LocalFile, MediaCategory};
use rutas_core::{FormsConfig, UploadError};

/// Per-file media checks.
///
/// Classifies a file by its declared content type and enforces the allowed
/// type list and size ceiling of its category. Count quotas depend on the
/// form's current media and are enforced by the reconciler.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    image_max_size: u64,
    video_max_size: u64,
    image_content_types: Vec<String>,
    video_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(
        image_max_size: u64,
        video_max_size: u64,
        image_content_types: Vec<String>,
        video_content_types: Vec<String>,
    ) -> Self {
        Self {
            image_max_size,
            video_max_size,
            image_content_types,
            video_content_types,
        }
    }

    pub fn from_config(config: &FormsConfig) -> Self {
        Self::new(
            config.max_size_bytes(MediaCategory::Image),
            config.max_size_bytes(MediaCategory::Video),
            config.content_types(MediaCategory::Image).to_vec(),
            config.content_types(MediaCategory::Video).to_vec(),
        )
    }

    fn allowed_content_types(&self, category: MediaCategory) -> &[String] {
        match category {
            MediaCategory::Image => &self.image_content_types,
            MediaCategory::Video => &self.video_content_types,
        }
    }

    fn max_size(&self, category: MediaCategory) -> u64 {
        match category {
            MediaCategory::Image => self.image_max_size,
            MediaCategory::Video => self.video_max_size,
        }
    }

    /// Validate content type, returning the file's category.
    pub fn validate_content_type(&self, file: &LocalFile) -> Result<MediaCategory, UploadError> {
        let disallowed = || UploadError::DisallowedType {
            file: file.name.clone(),
            content_type: file.content_type.clone(),
        };

        let category = file.category().ok_or_else(disallowed)?;
        let normalized = file.content_type.trim().to_lowercase();

        if !self
            .allowed_content_types(category)
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(disallowed());
        }

        Ok(category)
    }

    /// Validate file size against its category ceiling
    pub fn validate_file_size(
        &self,
        file: &LocalFile,
        category: MediaCategory,
    ) -> Result<(), UploadError> {
        let max = self.max_size(category);
        if file.size_bytes > max {
            return Err(UploadError::FileTooLarge {
                file: file.name.clone(),
                size: file.size_bytes,
                max,
            });
        }
        Ok(())
    }

    /// Validate type and size, returning the file's category.
    pub fn validate_all(&self, file: &LocalFile) -> Result<MediaCategory, UploadError> {
        let category = self.validate_content_type(file)?;
        self.validate_file_size(file, category)?;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn test_validator() -> MediaValidator {
        MediaValidator::new(
            MB,
            10 * MB,
            vec!["image/jpeg".to_string(), "image/png".to_string()],
            vec!["video/mp4".to_string()],
        )
    }

    #[test]
    fn test_validate_content_type_ok() {
        let validator = test_validator();
        let file = LocalFile::declared("a.jpg", "image/jpeg", 10);
        assert_eq!(
            validator.validate_content_type(&file),
            Ok(MediaCategory::Image)
        );
        let file = LocalFile::declared("b.png", "IMAGE/PNG", 10);
        assert_eq!(
            validator.validate_content_type(&file),
            Ok(MediaCategory::Image)
        );
    }

    #[test]
    fn test_validate_content_type_unknown_category() {
        let validator = test_validator();
        let file = LocalFile::declared("doc.pdf", "application/pdf", 10);
        assert!(matches!(
            validator.validate_content_type(&file),
            Err(UploadError::DisallowedType { .. })
        ));
    }

    #[test]
    fn test_validate_content_type_not_in_allowed_list() {
        let validator = test_validator();
        let file = LocalFile::declared("anim.gif", "image/gif", 10);
        assert!(matches!(
            validator.validate_content_type(&file),
            Err(UploadError::DisallowedType { .. })
        ));
    }

    #[test]
    fn test_validate_file_size_per_category() {
        let validator = test_validator();
        // 2MB is too large for an image but fine for a video
        let image = LocalFile::declared("big.jpg", "image/jpeg", 2 * MB);
        let video = LocalFile::declared("clip.mp4", "video/mp4", 2 * MB);
        assert_eq!(
            validator.validate_all(&image),
            Err(UploadError::FileTooLarge {
                file: "big.jpg".to_string(),
                size: 2 * MB,
                max: MB,
            })
        );
        assert_eq!(validator.validate_all(&video), Ok(MediaCategory::Video));
    }

    #[test]
    fn test_validate_file_size_at_ceiling() {
        let validator = test_validator();
        let file = LocalFile::declared("exact.jpg", "image/jpeg", MB);
        assert!(validator.validate_all(&file).is_ok());
    }

    #[test]
    fn test_from_config() {
        let validator = MediaValidator::from_config(&FormsConfig::default());
        let file = LocalFile::declared("clip.webm", "video/webm", 50 * MB);
        assert_eq!(validator.validate_all(&file), Ok(MediaCategory::Video));
    }
}
