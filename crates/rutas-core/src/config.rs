//! Form engine configuration.
//!
//! Loaded from the environment (and a `.env` file when present). Every value
//! has a default so `FormsConfig::default()` is usable in tests.

use std::env;

use crate::models::MediaCategory;

const MAX_IMAGES: usize = 10;
const MAX_VIDEOS: usize = 3;
const MAX_IMAGE_SIZE_MB: u64 = 10;
const MAX_VIDEO_SIZE_MB: u64 = 100;
const MIN_LOCATION_QUERY_LEN: usize = 3;
const DESCRIPTION_MAX_LEN: usize = 2000;
const RSVP_MAX_ATTENDEES: i64 = 10;
const RSVP_MESSAGE_MAX_LEN: usize = 500;
const DEFAULT_IMAGE_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";
const DEFAULT_VIDEO_CONTENT_TYPES: &str = "video/mp4,video/webm,video/quicktime";
const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:4000/uploads";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Limits and policies applied by the form engine.
#[derive(Clone, Debug, PartialEq)]
pub struct FormsConfig {
    // Media quotas
    pub max_images: usize,
    pub max_videos: usize,
    pub max_image_size_bytes: u64,
    pub max_video_size_bytes: u64,
    pub image_content_types: Vec<String>,
    pub video_content_types: Vec<String>,
    /// Persisted media URLs are `{media_base_url}/{name}`
    pub media_base_url: String,
    // Location resolver
    pub min_location_query_len: usize,
    // Submission rules
    pub require_contact_channel: bool,
    pub description_max_len: usize,
    // RSVP
    pub rsvp_max_attendees: i64,
    pub rsvp_message_max_len: usize,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
            max_videos: MAX_VIDEOS,
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * BYTES_PER_MB,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * BYTES_PER_MB,
            image_content_types: split_list(DEFAULT_IMAGE_CONTENT_TYPES),
            video_content_types: split_list(DEFAULT_VIDEO_CONTENT_TYPES),
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
            min_location_query_len: MIN_LOCATION_QUERY_LEN,
            require_contact_channel: false,
            description_max_len: DESCRIPTION_MAX_LEN,
            rsvp_max_attendees: RSVP_MAX_ATTENDEES,
            rsvp_message_max_len: RSVP_MESSAGE_MAX_LEN,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl FormsConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = FormsConfig {
            max_images: env_or("MAX_IMAGES", MAX_IMAGES),
            max_videos: env_or("MAX_VIDEOS", MAX_VIDEOS),
            max_image_size_bytes: env_or("MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB) * BYTES_PER_MB,
            max_video_size_bytes: env_or("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB) * BYTES_PER_MB,
            image_content_types: split_list(
                &env::var("IMAGE_CONTENT_TYPES")
                    .unwrap_or_else(|_| DEFAULT_IMAGE_CONTENT_TYPES.to_string()),
            ),
            video_content_types: split_list(
                &env::var("VIDEO_CONTENT_TYPES")
                    .unwrap_or_else(|_| DEFAULT_VIDEO_CONTENT_TYPES.to_string()),
            ),
            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MEDIA_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            min_location_query_len: env_or("MIN_LOCATION_QUERY_LEN", MIN_LOCATION_QUERY_LEN),
            require_contact_channel: env::var("REQUIRE_CONTACT_CHANNEL")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            description_max_len: env_or("DESCRIPTION_MAX_LEN", DESCRIPTION_MAX_LEN),
            rsvp_max_attendees: env_or("RSVP_MAX_ATTENDEES", RSVP_MAX_ATTENDEES),
            rsvp_message_max_len: env_or("RSVP_MESSAGE_MAX_LEN", RSVP_MESSAGE_MAX_LEN),
        };

        config.validate()?;
        tracing::debug!(
            max_images = config.max_images,
            max_videos = config.max_videos,
            require_contact_channel = config.require_contact_channel,
            "Loaded form configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.image_content_types.is_empty() || self.video_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "IMAGE_CONTENT_TYPES and VIDEO_CONTENT_TYPES must not be empty"
            ));
        }

        let misfiled = self
            .image_content_types
            .iter()
            .find(|ct| !ct.starts_with("image/"))
            .or_else(|| {
                self.video_content_types
                    .iter()
                    .find(|ct| !ct.starts_with("video/"))
            });
        if let Some(content_type) = misfiled {
            return Err(anyhow::anyhow!(
                "Content type '{}' is listed under the wrong media category",
                content_type
            ));
        }

        if self.min_location_query_len == 0 {
            return Err(anyhow::anyhow!(
                "MIN_LOCATION_QUERY_LEN must be at least 1"
            ));
        }

        if self.rsvp_max_attendees < 1 {
            return Err(anyhow::anyhow!("RSVP_MAX_ATTENDEES must be at least 1"));
        }

        if !self.media_base_url.starts_with("http://") && !self.media_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "MEDIA_BASE_URL must be an http(s) URL"
            ));
        }

        Ok(())
    }

    /// Count ceiling for a media category.
    pub fn max_count(&self, category: MediaCategory) -> usize {
        match category {
            MediaCategory::Image => self.max_images,
            MediaCategory::Video => self.max_videos,
        }
    }

    /// Per-file size ceiling for a media category.
    pub fn max_size_bytes(&self, category: MediaCategory) -> u64 {
        match category {
            MediaCategory::Image => self.max_image_size_bytes,
            MediaCategory::Video => self.max_video_size_bytes,
        }
    }

    /// Accepted MIME types for a media category.
    pub fn content_types(&self, category: MediaCategory) -> &[String] {
        match category {
            MediaCategory::Image => &self.image_content_types,
            MediaCategory::Video => &self.video_content_types,
        }
    }
}
