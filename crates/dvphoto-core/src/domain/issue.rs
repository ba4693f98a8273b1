//! Machine-readable issue tags raised during validation.

use serde::{Deserialize, Serialize};

/// How an issue affects the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Rejects the photo (`is_valid = false`).
    Error,
    /// Lowers the score but never rejects.
    Warning,
}

/// A compliance issue.
///
/// Serialized in `snake_case` so UIs can key help text off the tag.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueTag {
    /// Declared MIME type is not JPEG or PNG.
    UnsupportedFormat,
    /// File exceeds the byte-size limit.
    FileTooLarge,
    /// Width or height outside the allowed pixel range.
    DimensionsOutOfRange,
    /// Aspect ratio is not 1:1.
    NotSquare,
    /// Declared MIME type disagrees with the file's magic bytes.
    ContentTypeMismatch,
    /// Decoding or analysis failed.
    AnalysisFailed,
    /// No face found.
    NoFace,
    /// More than one face found.
    MultipleFaces,
    /// Face is off-center.
    FaceNotCentered,
    /// Eyes appear closed or hidden.
    EyesNotOpen,
    /// Expression is not neutral.
    NonNeutralExpression,
    /// Background is not a plain colour.
    BackgroundNotPlain,
    /// Gradient or shadow on the background.
    ShadowsDetected,
    /// Photo is out of focus.
    LowSharpness,
    /// Photo is too dark or too bright.
    BrightnessOutOfRange,
    /// Dynamic range is too narrow.
    LowContrast,
}

impl IssueTag {
    /// Severity of this issue.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::UnsupportedFormat
            | Self::FileTooLarge
            | Self::DimensionsOutOfRange
            | Self::NotSquare
            | Self::AnalysisFailed
            | Self::NoFace
            | Self::MultipleFaces => Severity::Error,
            Self::ContentTypeMismatch
            | Self::FaceNotCentered
            | Self::EyesNotOpen
            | Self::NonNeutralExpression
            | Self::BackgroundNotPlain
            | Self::ShadowsDetected
            | Self::LowSharpness
            | Self::BrightnessOutOfRange
            | Self::LowContrast => Severity::Warning,
        }
    }

    /// Advice shown to the applicant when this issue fires.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "Save the photo as a JPEG or PNG file",
            Self::FileTooLarge => {
                "Reduce the file size, for example by saving at a lower JPEG quality"
            }
            Self::DimensionsOutOfRange => {
                "Resize the photo to fall within the allowed pixel dimensions"
            }
            Self::NotSquare => "Crop the photo to a square (1:1) aspect ratio",
            Self::ContentTypeMismatch => "Re-save the photo so its file type matches its contents",
            Self::AnalysisFailed => "Try again with a different photo file",
            Self::NoFace => "Make sure your face is clearly visible and centered in the photo",
            Self::MultipleFaces => "Only one person may appear in the photo",
            Self::FaceNotCentered => "Center your face in the frame",
            Self::EyesNotOpen => "Keep both eyes open and looking at the camera",
            Self::NonNeutralExpression => "Keep a neutral expression with your mouth closed",
            Self::BackgroundNotPlain => "Use a plain light background",
            Self::ShadowsDetected => {
                "Use even lighting to avoid shadows on your face and background"
            }
            Self::LowSharpness => {
                "Use a sharper photo: hold the camera steady and make sure it is in focus"
            }
            Self::BrightnessOutOfRange => {
                "Adjust the lighting so the photo is neither too dark nor too bright"
            }
            Self::LowContrast => {
                "Improve the lighting to increase contrast between you and the background"
            }
        }
    }
}

/// A single issue with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Machine-readable tag.
    pub tag: IssueTag,
    /// Message shown to the applicant.
    pub message: String,
}

impl Finding {
    /// Creates a finding.
    #[must_use]
    pub fn new(tag: IssueTag, message: impl Into<String>) -> Self {
        Self {
            tag,
            message: message.into(),
        }
    }

    /// Severity of the underlying tag.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.tag.severity()
    }
}
