//! Media reconciler
//!
//! Merges media the backend already stores with files staged locally in this
//! form session. The view addresses entries by position in a per-category
//! list ordered persisted-before-staged, so every index here is computed over
//! that same view:
//!
//! ```text
//! images: [persisted images..., staged images...]
//! videos: [persisted videos..., staged videos...]
//! ```
//!
//! All mutations take `&mut self`, so they apply one at a time in call order.

use rutas_core::models::{LocalFile, MediaCategory, MediaRef};
use rutas_core::{FormsConfig, RemovalError, UploadError};

use crate::preview::{PreviewHandle, PreviewProvider};
use crate::validator::MediaValidator;

#[derive(Debug)]
struct StagedEntry {
    file: LocalFile,
    preview: Option<PreviewHandle>,
}

/// What a successful `remove_at` dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovedMedia {
    /// A server-side reference; the backend drops it on submit.
    Persisted(MediaRef),
    Staged(LocalFile),
}

/// Displayable URLs in view order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPreviews {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl MediaPreviews {
    pub fn for_category(&self, category: MediaCategory) -> &[String] {
        match category {
            MediaCategory::Image => &self.images,
            MediaCategory::Video => &self.videos,
        }
    }
}

pub struct MediaReconciler {
    validator: MediaValidator,
    max_images: usize,
    max_videos: usize,
    media_base_url: String,
    persisted: Vec<MediaRef>,
    removed: Vec<MediaRef>,
    staged: Vec<StagedEntry>,
    previews: Box<dyn PreviewProvider>,
}

impl std::fmt::Debug for MediaReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaReconciler")
            .field("persisted", &self.persisted)
            .field("removed", &self.removed)
            .field("staged", &self.staged.len())
            .finish()
    }
}

impl MediaReconciler {
    pub fn new(config: &FormsConfig, previews: Box<dyn PreviewProvider>) -> Self {
        Self {
            validator: MediaValidator::from_config(config),
            max_images: config.max_count(MediaCategory::Image),
            max_videos: config.max_count(MediaCategory::Video),
            media_base_url: config.media_base_url.trim_end_matches('/').to_string(),
            persisted: Vec::new(),
            removed: Vec::new(),
            staged: Vec::new(),
            previews,
        }
    }

    /// Replace all media with a persisted set, releasing staged previews.
    pub fn load_persisted(&mut self, media: Vec<MediaRef>) {
        self.clear();
        self.persisted = media;
    }

    /// Drop everything, releasing every preview handle.
    pub fn clear(&mut self) {
        self.release_all();
        self.staged.clear();
        self.persisted.clear();
        self.removed.clear();
    }

    /// Surviving persisted media, in order
    pub fn persisted(&self) -> &[MediaRef] {
        &self.persisted
    }

    /// Persisted media removed during this session
    pub fn removed_persisted(&self) -> &[MediaRef] {
        &self.removed
    }

    /// Staged files, in arrival order
    pub fn staged_files(&self) -> impl Iterator<Item = &LocalFile> {
        self.staged.iter().map(|entry| &entry.file)
    }

    pub fn persisted_count(&self, category: MediaCategory) -> usize {
        self.persisted
            .iter()
            .filter(|media| media.media_type == category)
            .count()
    }

    pub fn staged_count(&self, category: MediaCategory) -> usize {
        self.staged
            .iter()
            .filter(|entry| entry.file.category() == Some(category))
            .count()
    }

    /// Length of the category's merged view
    pub fn count(&self, category: MediaCategory) -> usize {
        self.persisted_count(category) + self.staged_count(category)
    }

    fn max_count(&self, category: MediaCategory) -> usize {
        match category {
            MediaCategory::Image => self.max_images,
            MediaCategory::Video => self.max_videos,
        }
    }

    /// Validate a batch and append it to the staged files.
    ///
    /// The whole batch is rejected if any file has a disallowed type, exceeds
    /// its size ceiling, or would push its category past the count ceiling.
    pub fn stage(&mut self, files: Vec<LocalFile>) -> Result<(), UploadError> {
        let existing_images = self.count(MediaCategory::Image);
        let existing_videos = self.count(MediaCategory::Video);
        let mut images = existing_images;
        let mut videos = existing_videos;

        for file in &files {
            let category = self.validator.validate_all(file)?;
            match category {
                MediaCategory::Image => {
                    images += 1;
                    if images > self.max_images {
                        return Err(UploadError::TooManyImages {
                            file: file.name.clone(),
                            remaining: self.max_images.saturating_sub(existing_images),
                        });
                    }
                }
                MediaCategory::Video => {
                    videos += 1;
                    if videos > self.max_videos {
                        return Err(UploadError::TooManyVideos {
                            file: file.name.clone(),
                            remaining: self.max_videos.saturating_sub(existing_videos),
                        });
                    }
                }
            }
        }

        tracing::debug!(
            files = files.len(),
            images = images - existing_images,
            videos = videos - existing_videos,
            "Staged media batch"
        );

        self.staged.extend(
            files
                .into_iter()
                .map(|file| StagedEntry { file, preview: None }),
        );
        Ok(())
    }

    /// Remove the entry at `index` of the category's merged view.
    pub fn remove_at(
        &mut self,
        category: MediaCategory,
        index: usize,
    ) -> Result<RemovedMedia, RemovalError> {
        let persisted_len = self.persisted_count(category);
        let len = persisted_len + self.staged_count(category);
        if index >= len {
            return Err(RemovalError::InvalidSelection {
                category,
                index,
                len,
            });
        }

        if index < persisted_len {
            let position = self
                .persisted
                .iter()
                .enumerate()
                .filter(|(_, media)| media.media_type == category)
                .nth(index)
                .map(|(position, _)| position)
                .ok_or(RemovalError::InvalidSelection {
                    category,
                    index,
                    len,
                })?;
            let media = self.persisted.remove(position);
            tracing::debug!(name = %media.name, %category, "Removed persisted media");
            self.removed.push(media.clone());
            return Ok(RemovedMedia::Persisted(media));
        }

        let staged_index = index - persisted_len;
        let position = self
            .staged
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.file.category() == Some(category))
            .nth(staged_index)
            .map(|(position, _)| position)
            .ok_or(RemovalError::InvalidSelection {
                category,
                index,
                len,
            })?;
        let entry = self.staged.remove(position);
        if let Some(handle) = &entry.preview {
            self.previews.release(handle);
        }
        tracing::debug!(file = %entry.file.name, %category, "Removed staged file");
        Ok(RemovedMedia::Staged(entry.file))
    }

    /// Remote URL for a persisted reference
    pub fn remote_url(&self, media: &MediaRef) -> String {
        format!("{}/{}", self.media_base_url, media.name)
    }

    /// URLs for every entry, in view order.
    ///
    /// Staged files get a preview handle the first time they are shown; the
    /// handle is reused until the file is removed or the reconciler cleared.
    pub fn derive_preview_urls(&mut self) -> MediaPreviews {
        for entry in self.staged.iter_mut().filter(|e| e.preview.is_none()) {
            entry.preview = Some(self.previews.acquire(&entry.file));
        }

        let mut previews = MediaPreviews::default();
        for category in [MediaCategory::Image, MediaCategory::Video] {
            let urls = match category {
                MediaCategory::Image => &mut previews.images,
                MediaCategory::Video => &mut previews.videos,
            };
            urls.extend(
                self.persisted
                    .iter()
                    .filter(|media| media.media_type == category)
                    .map(|media| self.remote_url(media)),
            );
            urls.extend(
                self.staged
                    .iter()
                    .filter(|entry| entry.file.category() == Some(category))
                    .filter_map(|entry| entry.preview.as_ref())
                    .map(|handle| handle.as_str().to_string()),
            );
        }
        previews
    }

    /// Release every preview handle. Staged files are kept.
    pub fn release_all(&mut self) {
        for entry in &mut self.staged {
            if let Some(handle) = entry.preview.take() {
                self.previews.release(&handle);
            }
        }
    }

    /// Remaining capacity for a category
    pub fn remaining(&self, category: MediaCategory) -> usize {
        self.max_count(category).saturating_sub(self.count(category))
    }
}

impl Drop for MediaReconciler {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{BlobPreviewProvider, PreviewLedger};

    fn reconciler() -> (MediaReconciler, PreviewLedger) {
        let provider = BlobPreviewProvider::default();
        let ledger = provider.ledger();
        (
            MediaReconciler::new(&FormsConfig::default(), Box::new(provider)),
            ledger,
        )
    }

    fn image(name: &str) -> LocalFile {
        LocalFile::declared(name, "image/jpeg", 1024)
    }

    fn video(name: &str) -> LocalFile {
        LocalFile::declared(name, "video/mp4", 1024)
    }

    fn persisted_images(count: usize) -> Vec<MediaRef> {
        (0..count)
            .map(|i| MediaRef::new(format!("p{}.jpg", i), MediaCategory::Image))
            .collect()
    }

    #[test]
    fn test_quota_boundary_reaches_exact_limit() {
        let (mut media, _) = reconciler();
        media.load_persisted(persisted_images(9));

        assert!(media.stage(vec![image("a.jpg")]).is_ok());
        assert_eq!(media.count(MediaCategory::Image), 10);
        assert_eq!(media.remaining(MediaCategory::Image), 0);
    }

    #[test]
    fn test_quota_boundary_rejects_whole_batch() {
        let (mut media, _) = reconciler();
        media.load_persisted(persisted_images(9));

        let err = media
            .stage(vec![image("a.jpg"), image("b.jpg")])
            .unwrap_err();
        assert_eq!(
            err,
            UploadError::TooManyImages {
                file: "b.jpg".to_string(),
                remaining: 1,
            }
        );
        // No partial staging
        assert_eq!(media.staged_count(MediaCategory::Image), 0);
    }

    #[test]
    fn test_quota_remaining_can_be_zero() {
        let (mut media, _) = reconciler();
        media
            .stage(vec![video("1.mp4"), video("2.mp4"), video("3.mp4")])
            .unwrap();
        let err = media.stage(vec![video("4.mp4")]).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooManyVideos {
                file: "4.mp4".to_string(),
                remaining: 0,
            }
        );
    }

    #[test]
    fn test_stage_rejects_unknown_type_and_keeps_batch_out() {
        let (mut media, _) = reconciler();
        let err = media
            .stage(vec![
                image("a.jpg"),
                LocalFile::declared("notes.pdf", "application/pdf", 10),
            ])
            .unwrap_err();
        assert!(matches!(err, UploadError::DisallowedType { ref file, .. } if file == "notes.pdf"));
        assert_eq!(media.count(MediaCategory::Image), 0);
    }

    #[test]
    fn test_stage_rejects_oversized_file() {
        let (mut media, _) = reconciler();
        let too_big = LocalFile::declared("huge.jpg", "image/jpeg", 11 * 1024 * 1024);
        assert!(matches!(
            media.stage(vec![too_big]),
            Err(UploadError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_remove_at_index_mapping() {
        let (mut media, _) = reconciler();
        media.load_persisted(vec![
            MediaRef::new("p1.jpg", MediaCategory::Image),
            MediaRef::new("v1.mp4", MediaCategory::Video),
            MediaRef::new("p2.jpg", MediaCategory::Image),
        ]);
        media.stage(vec![image("s1.jpg")]).unwrap();

        // Index 2 of images is the first staged image
        let removed = media.remove_at(MediaCategory::Image, 2).unwrap();
        assert_eq!(removed, RemovedMedia::Staged(image("s1.jpg")));

        let removed = media.remove_at(MediaCategory::Video, 0).unwrap();
        assert_eq!(
            removed,
            RemovedMedia::Persisted(MediaRef::new("v1.mp4", MediaCategory::Video))
        );
        assert_eq!(media.persisted_count(MediaCategory::Image), 2);
        assert_eq!(media.removed_persisted().len(), 1);
    }

    #[test]
    fn test_remove_at_out_of_range_changes_nothing() {
        let (mut media, _) = reconciler();
        media.load_persisted(persisted_images(1));
        media.stage(vec![image("s.jpg")]).unwrap();

        media.remove_at(MediaCategory::Image, 1).unwrap();
        let persisted_before = media.persisted().to_vec();
        let staged_before: Vec<LocalFile> = media.staged_files().cloned().collect();

        let err = media.remove_at(MediaCategory::Image, 1).unwrap_err();
        assert_eq!(
            err,
            RemovalError::InvalidSelection {
                category: MediaCategory::Image,
                index: 1,
                len: 1,
            }
        );
        assert_eq!(media.persisted(), persisted_before.as_slice());
        assert_eq!(
            media.staged_files().cloned().collect::<Vec<_>>(),
            staged_before
        );
    }

    #[test]
    fn test_removal_keeps_survivor_order() {
        let (mut media, _) = reconciler();
        media
            .stage(vec![image("a.jpg"), video("x.mp4"), image("b.jpg"), image("c.jpg")])
            .unwrap();

        media.remove_at(MediaCategory::Image, 1).unwrap();

        let names: Vec<&str> = media.staged_files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "x.mp4", "c.jpg"]);
    }

    #[test]
    fn test_previews_in_view_order() {
        let (mut media, ledger) = reconciler();
        media.load_persisted(vec![
            MediaRef::new("v.mp4", MediaCategory::Video),
            MediaRef::new("p.jpg", MediaCategory::Image),
        ]);
        media.stage(vec![video("s.mp4"), image("s.jpg")]).unwrap();

        let previews = media.derive_preview_urls();
        assert_eq!(previews.images.len(), 2);
        assert_eq!(previews.images[0], "http://localhost:4000/uploads/p.jpg");
        assert!(previews.images[1].starts_with("blob:"));
        assert_eq!(previews.videos[0], "http://localhost:4000/uploads/v.mp4");
        assert!(previews.videos[1].starts_with("blob:"));
        assert_eq!(ledger.live(), 2);

        // Deriving again reuses handles
        let again = media.derive_preview_urls();
        assert_eq!(again, previews);
        assert_eq!(ledger.acquired(), 2);
    }

    #[test]
    fn test_removal_releases_preview_once() {
        let (mut media, ledger) = reconciler();
        media.stage(vec![image("a.jpg"), image("b.jpg")]).unwrap();
        let previews = media.derive_preview_urls();
        assert_eq!(ledger.live(), 2);

        media.remove_at(MediaCategory::Image, 0).unwrap();
        assert_eq!(ledger.live(), 1);
        assert!(!ledger.is_live(&PreviewHandle::new(previews.images[0].clone())));

        drop(media);
        assert_eq!(ledger.live(), 0);
        assert_eq!(ledger.released(), 2);
        assert_eq!(ledger.invalid_releases(), 0);
    }

    #[test]
    fn test_stage_then_remove_restores_staged_set() {
        let (mut media, ledger) = reconciler();
        media.stage(vec![video("base.mp4")]).unwrap();
        media.derive_preview_urls();
        let before: Vec<LocalFile> = media.staged_files().cloned().collect();
        let acquired_before = ledger.acquired();

        media.stage(vec![video("f1.mp4"), video("f2.mp4")]).unwrap();
        media.derive_preview_urls();
        let last = media.count(MediaCategory::Video) - 1;
        media.remove_at(MediaCategory::Video, last).unwrap();
        media.remove_at(MediaCategory::Video, last - 1).unwrap();

        assert_eq!(media.staged_files().cloned().collect::<Vec<_>>(), before);
        assert_eq!(ledger.acquired() - acquired_before, 2);
        assert_eq!(ledger.released(), 2);
        assert_eq!(ledger.invalid_releases(), 0);
        assert_eq!(ledger.live(), 1);
    }

    #[test]
    fn test_clear_then_drop_releases_exactly_once() {
        let (mut media, ledger) = reconciler();
        media.stage(vec![image("a.jpg")]).unwrap();
        media.derive_preview_urls();

        media.clear();
        drop(media);

        assert_eq!(ledger.acquired(), 1);
        assert_eq!(ledger.released(), 1);
        assert_eq!(ledger.invalid_releases(), 0);
    }
}
