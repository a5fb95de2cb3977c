//! Render job configuration and its validation rules.
//!
//! Pure functions so both the submitter CLI and the repository layer can
//! reject a bad job before anything touches the database.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a job name (also used for output directory names).
const MAX_JOB_NAME_LEN: usize = 128;

/// POV-Ray quality levels run 0 (color preview) through 11 (full radiosity).
pub const MIN_QUALITY: i16 = 0;
pub const MAX_QUALITY: i16 = 11;

/// Antialias recursion depth accepted by the renderer (`+R1`..`+R9`).
pub const MIN_ANTIALIAS_DEPTH: i16 = 1;
pub const MAX_ANTIALIAS_DEPTH: i16 = 9;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Immutable render settings shared by every frame of a job.
///
/// Mirrors the `render_jobs` columns; the submitter builds one of these from
/// the generator manifest and it never changes after the job row is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: i32,
    pub height: i32,
    pub fps: i32,
    pub quality: i16,
    pub antialias: bool,
    pub antialias_depth: i16,
    pub antialias_threshold: f64,
    pub sampling_method: i16,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a job name.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_JOB_NAME_LEN` characters.
/// - Must contain only alphanumeric, hyphen, underscore, or dot characters
///   (the name becomes a directory under the output root).
pub fn validate_job_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Job name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_JOB_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Job name must not exceed {MAX_JOB_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CoreError::Validation(
            "Job name may only contain alphanumeric, hyphen, underscore, or dot characters"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate the frame count for a new job.
pub fn validate_total_frames(total_frames: i32) -> Result<(), CoreError> {
    if total_frames <= 0 {
        return Err(CoreError::Validation(format!(
            "total_frames must be positive, got {total_frames}"
        )));
    }
    Ok(())
}

/// Validate a render configuration.
///
/// Rules:
/// - Width, height, and fps must be positive.
/// - Quality must be in `MIN_QUALITY..=MAX_QUALITY`.
/// - When antialiasing is on, the depth must be in
///   `MIN_ANTIALIAS_DEPTH..=MAX_ANTIALIAS_DEPTH` and the threshold
///   non-negative.
pub fn validate_render_config(config: &RenderConfig) -> Result<(), CoreError> {
    if config.width <= 0 || config.height <= 0 {
        return Err(CoreError::Validation(format!(
            "Render dimensions must be positive, got {}x{}",
            config.width, config.height
        )));
    }
    if config.fps <= 0 {
        return Err(CoreError::Validation(format!(
            "fps must be positive, got {}",
            config.fps
        )));
    }
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&config.quality) {
        return Err(CoreError::Validation(format!(
            "Quality must be in {MIN_QUALITY}..={MAX_QUALITY}, got {}",
            config.quality
        )));
    }
    if config.antialias {
        if !(MIN_ANTIALIAS_DEPTH..=MAX_ANTIALIAS_DEPTH).contains(&config.antialias_depth) {
            return Err(CoreError::Validation(format!(
                "Antialias depth must be in {MIN_ANTIALIAS_DEPTH}..={MAX_ANTIALIAS_DEPTH}, got {}",
                config.antialias_depth
            )));
        }
        if config.antialias_threshold < 0.0 {
            return Err(CoreError::Validation(format!(
                "Antialias threshold must be non-negative, got {}",
                config.antialias_threshold
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RenderConfig {
        RenderConfig {
            width: 1920,
            height: 1080,
            fps: 30,
            quality: 9,
            antialias: true,
            antialias_depth: 3,
            antialias_threshold: 0.3,
            sampling_method: 1,
        }
    }

    // -- validate_job_name ----------------------------------------------------

    #[test]
    fn valid_job_name() {
        assert!(validate_job_name("Fountain_1920x1080_Q9").is_ok());
    }

    #[test]
    fn empty_job_name_rejected() {
        assert!(validate_job_name("").is_err());
    }

    #[test]
    fn job_name_with_path_separator_rejected() {
        assert!(validate_job_name("jobs/evil").is_err());
    }

    #[test]
    fn job_name_too_long_rejected() {
        let name = "a".repeat(MAX_JOB_NAME_LEN + 1);
        assert!(validate_job_name(&name).is_err());
    }

    // -- validate_total_frames ------------------------------------------------

    #[test]
    fn positive_frame_count_accepted() {
        assert!(validate_total_frames(3600).is_ok());
    }

    #[test]
    fn zero_frame_count_rejected() {
        assert!(validate_total_frames(0).is_err());
    }

    #[test]
    fn negative_frame_count_rejected() {
        assert!(validate_total_frames(-10).is_err());
    }

    // -- validate_render_config -----------------------------------------------

    #[test]
    fn valid_config_accepted() {
        assert!(validate_render_config(&config()).is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        let mut c = config();
        c.width = 0;
        assert!(validate_render_config(&c).is_err());
    }

    #[test]
    fn negative_height_rejected() {
        let mut c = config();
        c.height = -480;
        assert!(validate_render_config(&c).is_err());
    }

    #[test]
    fn quality_out_of_range_rejected() {
        let mut c = config();
        c.quality = 12;
        assert!(validate_render_config(&c).is_err());
    }

    #[test]
    fn antialias_depth_checked_only_when_enabled() {
        let mut c = config();
        c.antialias = false;
        c.antialias_depth = 0;
        assert!(validate_render_config(&c).is_ok());

        c.antialias = true;
        assert!(validate_render_config(&c).is_err());
    }
}
