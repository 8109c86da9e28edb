use base64::Engine;
use palette_pack::{ImageMetadata, PixelBuffer, Reformer};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::error::PipelineError;
use crate::models::ReformSettings;
use crate::rendering::encode_preview;
use crate::services::decoder::decode_image;

/// Everything one reform run produces.
#[derive(Debug, Clone)]
pub struct ReformOutput {
    pub metadata: ImageMetadata,
    /// Generated C source
    pub source: String,
    /// Indexed PNG of the packed image
    pub preview_png: Vec<u8>,
}

impl ReformOutput {
    /// JSON view used by the HTTP API.
    pub fn summary(&self) -> ReformSummary {
        let meta = &self.metadata;
        ReformSummary {
            width: meta.width(),
            height: meta.height(),
            depth: meta.depth().bits(),
            color_count: meta.palette().len(),
            palette: meta
                .palette()
                .entries()
                .iter()
                .map(|c| format!("#{c:06x}"))
                .collect(),
            pixels_len: meta.pixels().len(),
            source: self.source.clone(),
            preview_png: base64::engine::general_purpose::STANDARD.encode(&self.preview_png),
        }
    }
}

/// Response body of `POST /api/reform`.
#[derive(Debug, Clone, Serialize)]
pub struct ReformSummary {
    pub width: usize,
    pub height: usize,
    pub depth: u8,
    pub color_count: usize,
    pub palette: Vec<String>,
    pub pixels_len: usize,
    pub source: String,
    /// Base64-encoded PNG
    pub preview_png: String,
}

/// Result of a ticketed submission.
#[derive(Debug)]
pub enum ReformOutcome {
    Completed(ReformOutput),
    /// A newer submission was made while this one ran; its result was
    /// discarded.
    Superseded,
}

/// Runs the reform pipeline off the async runtime.
///
/// [`run`](Self::run) serves independent requests. [`submit`](Self::submit)
/// implements cancel-and-restart: each call takes a new ticket, and a run
/// that finishes after a newer ticket was issued reports
/// [`ReformOutcome::Superseded`] instead of its result.
#[derive(Debug, Default)]
pub struct ReformService {
    generation: AtomicU64,
    /// Held while a completed result is committed
    commit_lock: Mutex<()>,
}

impl ReformService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous pipeline: resolve the target size, reform, serialize and
    /// encode the preview.
    pub fn render_blocking(
        image: &PixelBuffer,
        settings: &ReformSettings,
    ) -> Result<ReformOutput, PipelineError> {
        let (width, height) = settings.target_size(image.width(), image.height());
        let reformed = Reformer::new(settings.depth, width, height)?
            .dither(settings.dither)
            .reform(image)?;

        let source = reformed.to_source(&settings.prefix, settings.bracket_style);
        let metadata = reformed.into_metadata();
        let preview_png = encode_preview(&metadata)?;

        tracing::info!(
            width,
            height,
            depth = %settings.depth,
            dither = ?settings.dither,
            packed_bytes = metadata.pixels().len(),
            "Reformed image"
        );

        Ok(ReformOutput {
            metadata,
            source,
            preview_png,
        })
    }

    /// Decode and reform in a blocking task. Not ticketed.
    pub async fn run(
        &self,
        bytes: Vec<u8>,
        settings: ReformSettings,
    ) -> Result<ReformOutput, PipelineError> {
        tokio::task::spawn_blocking(move || {
            let image = decode_image(&bytes)?;
            Self::render_blocking(&image, &settings)
        })
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?
    }

    /// Decode and reform `bytes` as the newest submission.
    pub async fn submit(
        &self,
        bytes: Vec<u8>,
        settings: ReformSettings,
    ) -> Result<ReformOutcome, PipelineError> {
        let ticket = self.next_ticket();
        self.run_ticket(ticket, bytes, settings).await
    }

    /// Run a submission for a ticket taken earlier with
    /// [`next_ticket`](Self::next_ticket).
    ///
    /// Taking the ticket up front lets callers fix the submission order
    /// before handing the work to another task. Errors of a superseded run
    /// are discarded as well.
    pub async fn run_ticket(
        &self,
        ticket: u64,
        bytes: Vec<u8>,
        settings: ReformSettings,
    ) -> Result<ReformOutcome, PipelineError> {
        tracing::debug!(ticket, "Reform submitted");

        let result = self.run(bytes, settings).await;

        if !self.is_current(ticket) {
            tracing::debug!(ticket, "Reform superseded, discarding result");
            return Ok(ReformOutcome::Superseded);
        }
        result.map(ReformOutcome::Completed)
    }

    /// Run `commit` for a completed result only if `ticket` is still the
    /// newest, holding the commit lock so no stale commit can follow a
    /// newer one.
    ///
    /// Returns `None` without calling `commit` if the ticket was superseded.
    pub async fn commit<T>(&self, ticket: u64, commit: impl FnOnce() -> T) -> Option<T> {
        let _guard = self.commit_lock.lock().await;
        if !self.is_current(ticket) {
            tracing::debug!(ticket, "Superseded before commit, discarding result");
            return None;
        }
        Some(commit())
    }

    /// Issue a new ticket, invalidating every earlier one.
    pub fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the newest.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_pack::{BracketStyle, ColorDepth, Rgb};

    #[test]
    fn test_tickets_supersede_each_other() {
        let service = ReformService::new();
        let first = service.next_ticket();
        assert!(service.is_current(first));

        let second = service.next_ticket();
        assert!(second > first);
        assert!(!service.is_current(first));
        assert!(service.is_current(second));
    }

    #[test]
    fn test_render_blocking_keeps_source_size_by_default() {
        let image = PixelBuffer::filled(6, 4, Rgb::new(9, 9, 9));
        let output = ReformService::render_blocking(&image, &ReformSettings::default()).unwrap();

        assert_eq!(output.metadata.width(), 6);
        assert_eq!(output.metadata.height(), 4);
        assert!(output.source.contains("image8BPP_UNCOMP"));
        assert_eq!(&output.preview_png[..4], b"\x89PNG");
    }

    #[test]
    fn test_summary_fields() {
        let image = PixelBuffer::filled(2, 2, Rgb::new(200, 230, 210));
        let settings = ReformSettings {
            depth: ColorDepth::One,
            width: Some(4),
            height: Some(1),
            prefix: "dot".to_string(),
            bracket_style: BracketStyle::NextLine,
            ..ReformSettings::default()
        };
        let summary = ReformService::render_blocking(&image, &settings)
            .unwrap()
            .summary();

        assert_eq!((summary.width, summary.height), (4, 1));
        assert_eq!(summary.depth, 1);
        assert_eq!(summary.color_count, 2);
        // Light green quantizes to white at 1bpp
        assert_eq!(summary.palette, vec!["#ffffff", "#000000"]);
        assert_eq!(summary.pixels_len, 1);
        assert!(summary.source.contains("dot1BPP_UNCOMP =\n{"));
        assert!(!summary.preview_png.is_empty());
    }

    fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_submit_latest_completes() {
        let service = ReformService::new();

        let outcome = service
            .submit(png_bytes(3, 3, [255, 255, 255]), ReformSettings::default())
            .await
            .unwrap();
        let ReformOutcome::Completed(output) = outcome else {
            panic!("expected a completed reform");
        };
        assert_eq!(output.metadata.palette().entries()[0], 0xffffff);
    }

    #[tokio::test]
    async fn test_run_ticket_superseded_by_newer_ticket() {
        let service = ReformService::new();
        let stale = service.next_ticket();
        service.next_ticket();

        let outcome = service
            .run_ticket(stale, png_bytes(8, 8, [100, 150, 200]), ReformSettings::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ReformOutcome::Superseded));
    }

    #[tokio::test]
    async fn test_superseded_run_swallows_errors() {
        let service = ReformService::new();
        let stale = service.next_ticket();
        service.next_ticket();

        let outcome = service
            .run_ticket(stale, b"garbage".to_vec(), ReformSettings::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ReformOutcome::Superseded));
    }

    #[tokio::test]
    async fn test_commit_skips_superseded_ticket() {
        let service = ReformService::new();
        let stale = service.next_ticket();
        let current = service.next_ticket();

        let mut written = Vec::new();
        assert_eq!(service.commit(stale, || written.push(stale)).await, None);
        assert_eq!(service.commit(current, || written.push(current)).await, Some(()));
        assert_eq!(written, vec![current]);
    }

    #[tokio::test]
    async fn test_commit_after_newer_ticket_is_dropped() {
        let service = ReformService::new();
        let ticket = service.next_ticket();
        let outcome = service
            .run_ticket(ticket, png_bytes(2, 2, [0, 0, 0]), ReformSettings::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ReformOutcome::Completed(_)));

        // A newer change arrives after the run finished but before its write
        service.next_ticket();
        assert_eq!(service.commit(ticket, || "written").await, None);
    }

    #[tokio::test]
    async fn test_current_ticket_reports_errors() {
        let service = ReformService::new();
        let err = service
            .submit(b"garbage".to_vec(), ReformSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[tokio::test]
    async fn test_run_reports_decode_errors() {
        let service = ReformService::new();
        let err = service
            .run(b"garbage".to_vec(), ReformSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }
}
