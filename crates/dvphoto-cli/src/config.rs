//! Configuration file support for dvphoto.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/dvphoto/config.toml` (lowest priority)
//! - Project-local: `.dvphoto.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use dvphoto_core::{AnalysisMode, ValidationPolicy};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// File format, size and dimension constraints.
    pub constraints: ConstraintsConfig,
    /// Decoder resource limits.
    pub decoder: DecoderConfig,
    /// Quality metric calibration.
    pub quality: QualityConfig,
    /// Background classification bands.
    pub background: BackgroundConfig,
    /// Face heuristic thresholds.
    pub face: FaceConfig,
    /// Scoring thresholds.
    pub scoring: ScoringConfig,
    /// Points deducted per issue.
    pub deductions: DeductionsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
    /// Analysis mode: "basic" or "advanced".
    pub mode: Option<String>,
}

/// Constraint configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ConstraintsConfig {
    /// Largest accepted file, in bytes.
    pub max_file_size_bytes: Option<u64>,
    /// Smallest accepted width and height.
    pub min_dimension_px: Option<u32>,
    /// Largest accepted width and height.
    pub max_dimension_px: Option<u32>,
    /// Allowed deviation of width/height from 1.0.
    pub aspect_ratio_tolerance: Option<f64>,
}

/// Decoder configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Largest width or height the decoder will allocate for.
    pub max_decode_dimension_px: Option<u32>,
    /// Upper bound on decoder allocations, in bytes.
    pub max_alloc_bytes: Option<u64>,
}

/// Quality configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Mean Laplacian response that maps to sharpness 100.
    pub sharpness_normalization: Option<f64>,
}

/// Background configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Ring standard deviation below which the background is plain.
    pub plain_max_std_dev: Option<f64>,
    /// Ring standard deviation above which the background is patterned.
    pub pattern_min_std_dev: Option<f64>,
    /// Lower bound of the shadow band.
    pub shadow_min_std_dev: Option<f64>,
    /// Upper bound of the shadow band.
    pub shadow_max_std_dev: Option<f64>,
    /// Ring mean above which the tone is light.
    pub light_min_mean: Option<f64>,
    /// Ring mean above which the tone is medium.
    pub medium_min_mean: Option<f64>,
}

/// Face heuristic configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Share of each axis covered by the center window (0.0-1.0).
    pub center_region_fraction: Option<f64>,
    /// Skin-pixel ratio needed to detect a face.
    pub min_skin_ratio: Option<f64>,
    /// Dark-pixel ratio needed to detect a face.
    pub min_dark_ratio: Option<f64>,
    /// Dark-pixel ratio above which the eyes count as open.
    pub eyes_open_min_dark_ratio: Option<f64>,
}

/// Scoring threshold configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum sharpness (0-100).
    pub min_sharpness: Option<f64>,
    /// Minimum brightness (0-100).
    pub min_brightness: Option<f64>,
    /// Maximum brightness (0-100).
    pub max_brightness: Option<f64>,
    /// Minimum contrast (0-100).
    pub min_contrast: Option<f64>,
}

/// Deduction configuration, in points out of 100.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DeductionsConfig {
    pub no_face: Option<u32>,
    pub multiple_faces: Option<u32>,
    pub face_not_centered: Option<u32>,
    pub eyes_not_open: Option<u32>,
    pub non_neutral_expression: Option<u32>,
    pub background_not_plain: Option<u32>,
    pub shadows: Option<u32>,
    pub low_sharpness: Option<u32>,
    pub brightness_out_of_range: Option<u32>,
    pub low_contrast: Option<u32>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/dvphoto/config.toml`
    /// 2. Project-local: `.dvphoto.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. A layer that leaves the merged
    /// config invalid is dropped with a warning.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config.apply_layer(xdg_config, &xdg_path);
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.apply_layer(project_config, &project_path);
            }
        }

        config
    }

    /// Merges `layer` over `self` unless the result fails validation.
    fn apply_layer(&mut self, layer: Self, source: &Path) {
        let mut merged = self.clone();
        merged.merge(layer);
        match merged.validate() {
            Ok(()) => *self = merged,
            Err(e) => eprintln!("warning: ignoring {}: {e}", source.display()),
        }
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref m) = self.general.mode {
            if m != "basic" && m != "advanced" {
                return Err(format!(
                    "general.mode must be 'basic' or 'advanced', got '{m}'"
                ));
            }
        }

        let c = &self.constraints;
        if c.max_file_size_bytes == Some(0) {
            return Err("constraints.max_file_size_bytes must be positive".into());
        }
        if let (Some(min), Some(max)) = (c.min_dimension_px, c.max_dimension_px) {
            if min > max {
                return Err(format!(
                    "constraints.min_dimension_px ({min}) exceeds constraints.max_dimension_px ({max})"
                ));
            }
        }
        check_fraction("constraints.aspect_ratio_tolerance", c.aspect_ratio_tolerance)?;

        if let Some(n) = self.quality.sharpness_normalization {
            if n <= 0.0 {
                return Err(format!(
                    "quality.sharpness_normalization must be positive, got {n}"
                ));
            }
        }

        let f = &self.face;
        check_fraction("face.center_region_fraction", f.center_region_fraction)?;
        check_fraction("face.min_skin_ratio", f.min_skin_ratio)?;
        check_fraction("face.min_dark_ratio", f.min_dark_ratio)?;
        check_fraction("face.eyes_open_min_dark_ratio", f.eyes_open_min_dark_ratio)?;

        let s = &self.scoring;
        check_percent("scoring.min_sharpness", s.min_sharpness)?;
        check_percent("scoring.min_brightness", s.min_brightness)?;
        check_percent("scoring.max_brightness", s.max_brightness)?;
        check_percent("scoring.min_contrast", s.min_contrast)?;
        if let (Some(min), Some(max)) = (s.min_brightness, s.max_brightness) {
            if min > max {
                return Err(format!(
                    "scoring.min_brightness ({min}) exceeds scoring.max_brightness ({max})"
                ));
            }
        }

        let d = &self.deductions;
        for (key, value) in [
            ("no_face", d.no_face),
            ("multiple_faces", d.multiple_faces),
            ("face_not_centered", d.face_not_centered),
            ("eyes_not_open", d.eyes_not_open),
            ("non_neutral_expression", d.non_neutral_expression),
            ("background_not_plain", d.background_not_plain),
            ("shadows", d.shadows),
            ("low_sharpness", d.low_sharpness),
            ("brightness_out_of_range", d.brightness_out_of_range),
            ("low_contrast", d.low_contrast),
        ] {
            if let Some(points) = value {
                if points > 100 {
                    return Err(format!("deductions.{key} must be 0-100, got {points}"));
                }
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);
        self.general.mode = other.general.mode.or_else(|| self.general.mode.take());

        // Constraints
        let (c, o) = (&mut self.constraints, other.constraints);
        c.max_file_size_bytes = o.max_file_size_bytes.or(c.max_file_size_bytes);
        c.min_dimension_px = o.min_dimension_px.or(c.min_dimension_px);
        c.max_dimension_px = o.max_dimension_px.or(c.max_dimension_px);
        c.aspect_ratio_tolerance = o.aspect_ratio_tolerance.or(c.aspect_ratio_tolerance);

        // Decoder
        let (c, o) = (&mut self.decoder, other.decoder);
        c.max_decode_dimension_px = o.max_decode_dimension_px.or(c.max_decode_dimension_px);
        c.max_alloc_bytes = o.max_alloc_bytes.or(c.max_alloc_bytes);

        // Quality
        self.quality.sharpness_normalization = other
            .quality
            .sharpness_normalization
            .or(self.quality.sharpness_normalization);

        // Background
        let (c, o) = (&mut self.background, other.background);
        c.plain_max_std_dev = o.plain_max_std_dev.or(c.plain_max_std_dev);
        c.pattern_min_std_dev = o.pattern_min_std_dev.or(c.pattern_min_std_dev);
        c.shadow_min_std_dev = o.shadow_min_std_dev.or(c.shadow_min_std_dev);
        c.shadow_max_std_dev = o.shadow_max_std_dev.or(c.shadow_max_std_dev);
        c.light_min_mean = o.light_min_mean.or(c.light_min_mean);
        c.medium_min_mean = o.medium_min_mean.or(c.medium_min_mean);

        // Face
        let (c, o) = (&mut self.face, other.face);
        c.center_region_fraction = o.center_region_fraction.or(c.center_region_fraction);
        c.min_skin_ratio = o.min_skin_ratio.or(c.min_skin_ratio);
        c.min_dark_ratio = o.min_dark_ratio.or(c.min_dark_ratio);
        c.eyes_open_min_dark_ratio = o.eyes_open_min_dark_ratio.or(c.eyes_open_min_dark_ratio);

        // Scoring
        let (c, o) = (&mut self.scoring, other.scoring);
        c.min_sharpness = o.min_sharpness.or(c.min_sharpness);
        c.min_brightness = o.min_brightness.or(c.min_brightness);
        c.max_brightness = o.max_brightness.or(c.max_brightness);
        c.min_contrast = o.min_contrast.or(c.min_contrast);

        // Deductions
        let (c, o) = (&mut self.deductions, other.deductions);
        c.no_face = o.no_face.or(c.no_face);
        c.multiple_faces = o.multiple_faces.or(c.multiple_faces);
        c.face_not_centered = o.face_not_centered.or(c.face_not_centered);
        c.eyes_not_open = o.eyes_not_open.or(c.eyes_not_open);
        c.non_neutral_expression = o.non_neutral_expression.or(c.non_neutral_expression);
        c.background_not_plain = o.background_not_plain.or(c.background_not_plain);
        c.shadows = o.shadows.or(c.shadows);
        c.low_sharpness = o.low_sharpness.or(c.low_sharpness);
        c.brightness_out_of_range = o.brightness_out_of_range.or(c.brightness_out_of_range);
        c.low_contrast = o.low_contrast.or(c.low_contrast);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }

    /// Builds the validation policy: file values over hardcoded defaults.
    pub fn policy(&self) -> ValidationPolicy {
        let mut policy = ValidationPolicy::default();

        match self.general.mode.as_deref() {
            Some("basic") => policy.mode = AnalysisMode::Basic,
            Some("advanced") => policy.mode = AnalysisMode::Advanced,
            Some(other) => warn!("Ignoring unknown analysis mode '{other}'"),
            None => {}
        }

        let (p, c) = (&mut policy.constraints, &self.constraints);
        set(&mut p.max_file_size_bytes, c.max_file_size_bytes);
        set(&mut p.min_dimension_px, c.min_dimension_px);
        set(&mut p.max_dimension_px, c.max_dimension_px);
        set(&mut p.aspect_ratio_tolerance, c.aspect_ratio_tolerance);

        let (p, c) = (&mut policy.decoder, &self.decoder);
        set(&mut p.max_decode_dimension_px, c.max_decode_dimension_px);
        set(&mut p.max_alloc_bytes, c.max_alloc_bytes);

        set(
            &mut policy.quality.sharpness_normalization,
            self.quality.sharpness_normalization,
        );

        let (p, c) = (&mut policy.background, &self.background);
        set(&mut p.plain_max_std_dev, c.plain_max_std_dev);
        set(&mut p.pattern_min_std_dev, c.pattern_min_std_dev);
        set(&mut p.shadow_min_std_dev, c.shadow_min_std_dev);
        set(&mut p.shadow_max_std_dev, c.shadow_max_std_dev);
        set(&mut p.light_min_mean, c.light_min_mean);
        set(&mut p.medium_min_mean, c.medium_min_mean);

        let (p, c) = (&mut policy.face, &self.face);
        set(&mut p.center_region_fraction, c.center_region_fraction);
        set(&mut p.min_skin_ratio, c.min_skin_ratio);
        set(&mut p.min_dark_ratio, c.min_dark_ratio);
        set(&mut p.eyes_open_min_dark_ratio, c.eyes_open_min_dark_ratio);

        let (p, c) = (&mut policy.scoring, &self.scoring);
        set(&mut p.min_sharpness, c.min_sharpness);
        set(&mut p.min_brightness, c.min_brightness);
        set(&mut p.max_brightness, c.max_brightness);
        set(&mut p.min_contrast, c.min_contrast);

        let (p, c) = (&mut policy.scoring.deductions, &self.deductions);
        set(&mut p.no_face, c.no_face);
        set(&mut p.multiple_faces, c.multiple_faces);
        set(&mut p.face_not_centered, c.face_not_centered);
        set(&mut p.eyes_not_open, c.eyes_not_open);
        set(&mut p.non_neutral_expression, c.non_neutral_expression);
        set(&mut p.background_not_plain, c.background_not_plain);
        set(&mut p.shadows, c.shadows);
        set(&mut p.low_sharpness, c.low_sharpness);
        set(&mut p.brightness_out_of_range, c.brightness_out_of_range);
        set(&mut p.low_contrast, c.low_contrast);

        policy
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn check_fraction(key: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(format!("{key} must be 0.0-1.0, got {v}")),
        _ => Ok(()),
    }
}

fn check_percent(key: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(format!("{key} must be 0-100, got {v}")),
        _ => Ok(()),
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dvphoto").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.dvphoto.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".dvphoto.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
