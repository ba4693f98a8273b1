//! Mock implementations of core port and analyzer traits.

use std::sync::{Arc, Mutex, PoisonError};

use dvphoto_core::domain::{
    BackgroundAnalyzer, BackgroundReport, DecodedImage, FaceDetector, FaceReport, PhotoBlob,
    PhotoReport, QualityAssessor, QualityMetrics, Tone,
};
use dvphoto_core::ports::{
    BatchTally, PhotoSource, ProgressEvent, ProgressSink, ResultOutput, SourcedPhoto,
};

fn bump(counter: &Mutex<usize>) {
    *counter.lock().unwrap_or_else(PoisonError::into_inner) += 1;
}

fn read(counter: &Mutex<usize>) -> usize {
    *counter.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock implementation of `PhotoSource` for testing.
///
/// Yields pre-built photos, optionally interleaved with read failures, and
/// tracks iteration for assertions.
pub struct MockPhotoSource {
    entries: Vec<Result<SourcedPhoto, String>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockPhotoSource {
    /// Creates a new mock source with the given photos.
    #[must_use]
    pub fn new(photos: Vec<SourcedPhoto>) -> Self {
        Self {
            entries: photos.into_iter().map(Ok).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a mock source from `(path, blob)` pairs.
    #[must_use]
    pub fn from_blobs(blobs: impl IntoIterator<Item = (&'static str, PhotoBlob)>) -> Self {
        Self::new(
            blobs
                .into_iter()
                .map(|(path, blob)| SourcedPhoto {
                    path: path.to_string(),
                    blob,
                })
                .collect(),
        )
    }

    /// Appends an entry that fails to load with `reason`.
    #[must_use]
    pub fn with_unreadable(mut self, reason: &str) -> Self {
        self.entries.push(Err(reason.to_string()));
        self
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        read(&self.iteration_count)
    }
}

impl PhotoSource for MockPhotoSource {
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<SourcedPhoto>> + Send + '_> {
        bump(&self.iteration_count);
        Box::new(self.entries.iter().map(|entry| match entry {
            Ok(photo) => Ok(photo.clone()),
            Err(reason) => Err(anyhow::anyhow!("{reason}")),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<PhotoReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<PhotoReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        read(&self.flush_count)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &PhotoReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        bump(&self.flush_count);
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Checked` events.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Checked { .. }))
    }

    /// Returns the number of `Unreadable` events.
    #[must_use]
    pub fn unreadable_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Unreadable { .. }))
    }

    /// Returns the tally carried by the `Finished` event, if any.
    #[must_use]
    pub fn final_tally(&self) -> Option<BatchTally> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { tally } => Some(*tally),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

// === Analyzer Mocks ===

/// Quality assessor that returns fixed metrics and counts its calls.
#[derive(Clone)]
pub struct CountingQualityAssessor {
    metrics: QualityMetrics,
    calls: Arc<Mutex<usize>>,
}

impl CountingQualityAssessor {
    /// Creates an assessor that always reports `metrics`.
    #[must_use]
    pub fn new(metrics: QualityMetrics) -> Self {
        Self {
            metrics,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Metrics that pass every quality threshold.
    #[must_use]
    pub fn passing() -> Self {
        Self::new(QualityMetrics {
            sharpness: 90.0,
            brightness: 60.0,
            contrast: 70.0,
        })
    }

    /// Returns how many times `assess` was called, across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        read(&self.calls)
    }
}

impl QualityAssessor for CountingQualityAssessor {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn assess(&self, _image: &DecodedImage) -> anyhow::Result<QualityMetrics> {
        bump(&self.calls);
        Ok(self.metrics)
    }
}

/// Background analyzer that returns a fixed report and counts its calls.
#[derive(Clone)]
pub struct CountingBackgroundAnalyzer {
    report: BackgroundReport,
    calls: Arc<Mutex<usize>>,
}

impl CountingBackgroundAnalyzer {
    /// Creates an analyzer that always reports `report`.
    #[must_use]
    pub fn new(report: BackgroundReport) -> Self {
        Self {
            report,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A plain light background without shadows.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(BackgroundReport {
            is_plain: true,
            dominant_tone: Tone::Light,
            has_patterns: false,
            has_shadows: false,
        })
    }

    /// Returns how many times `analyze` was called, across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        read(&self.calls)
    }
}

impl BackgroundAnalyzer for CountingBackgroundAnalyzer {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn analyze(&self, _image: &DecodedImage) -> anyhow::Result<BackgroundReport> {
        bump(&self.calls);
        Ok(self.report)
    }
}

/// Face detector that returns a fixed report and counts its calls.
///
/// Stands in for a real detector when testing the multiple-face and
/// expression paths the built-in heuristic cannot produce.
#[derive(Clone)]
pub struct CountingFaceDetector {
    report: FaceReport,
    calls: Arc<Mutex<usize>>,
}

impl CountingFaceDetector {
    /// Creates a detector that always reports `report`.
    #[must_use]
    pub fn new(report: FaceReport) -> Self {
        Self {
            report,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// One centered face with open eyes and a neutral expression.
    #[must_use]
    pub fn compliant() -> Self {
        Self::new(FaceReport {
            detected: true,
            count: 1,
            centered: true,
            eyes_open: true,
            neutral_expression: true,
        })
    }

    /// Returns how many times `detect_face` was called, across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        read(&self.calls)
    }
}

impl FaceDetector for CountingFaceDetector {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn detect_face(&self, _image: &DecodedImage) -> anyhow::Result<FaceReport> {
        bump(&self.calls);
        Ok(self.report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dvphoto_core::domain::{ComplianceResult, PhotoMetadata};

    use super::*;

    #[test]
    fn test_mock_photo_source_empty() {
        let source = MockPhotoSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert_eq!(source.photos().count(), 0);
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_photo_source_with_photos() {
        let source =
            MockPhotoSource::from_blobs([("a.png", PhotoBlob::new(vec![1, 2], "image/png"))]);
        assert_eq!(source.count_hint(), Some(1));
        let photo = source.photos().next().unwrap().unwrap();
        assert_eq!(photo.path, "a.png");
    }

    #[test]
    fn test_mock_result_output() {
        let output = MockResultOutput::new();
        let metadata = PhotoMetadata {
            width: None,
            height: None,
            byte_size: 0,
            format: "image/png".into(),
            detected_format: None,
        };
        let report = PhotoReport {
            path: "test.png".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            result: ComplianceResult::from_findings(&[], 100, metadata),
        };

        output.write(&report).unwrap();
        output.flush().unwrap();

        assert_eq!(output.reports().len(), 1);
        assert_eq!(output.reports()[0].path, "test.png");
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_photo_source_yields_unreadable_entries() {
        let source = MockPhotoSource::empty().with_unreadable("Failed to read photo: gone.png");
        assert_eq!(source.count_hint(), Some(1));
        let err = source.photos().next().unwrap().unwrap_err();
        assert!(err.to_string().contains("gone.png"));
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();
        let tally = BatchTally {
            valid: 0,
            invalid: 0,
            unreadable: 1,
        };
        sink.on_event(ProgressEvent::Unreadable {
            reason: "Failed to read photo: gone.png".into(),
            tally,
        });
        sink.on_event(ProgressEvent::Finished { tally });

        assert_eq!(sink.unreadable_count(), 1);
        assert_eq!(sink.checked_count(), 0);
        assert_eq!(sink.final_tally(), Some(tally));
    }

    #[test]
    fn test_counting_mocks_share_counts_across_clones() {
        let detector = CountingFaceDetector::compliant();
        let clone = detector.clone();
        let image = DecodedImage::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();

        clone.detect_face(&image).unwrap();
        assert_eq!(detector.calls(), 1);
    }
}
