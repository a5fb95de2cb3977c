//! Per-job output layout.
//!
//! Every job owns one directory under the output root, holding one scene
//! input file and one rendered image per frame, both named with a
//! zero-padded frame number so the video assembler can consume them with a
//! single numbered glob.

use std::path::{Path, PathBuf};

/// Zero-pad width used in frame file names (`_frame-0042`).
pub const FRAME_PAD_WIDTH: usize = 4;

/// Resolved file locations for one frame of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePaths {
    /// Scene input file handed to the renderer (`+I`).
    pub scene_file: PathBuf,
    /// Image file the renderer writes (`+O`).
    pub image_file: PathBuf,
}

/// Output layout for a single job.
#[derive(Debug, Clone)]
pub struct JobLayout {
    job_name: String,
    job_dir: PathBuf,
    scene_stem: String,
}

impl JobLayout {
    /// Build the layout for `job_name` under `output_root`, deriving frame
    /// file names from the scene template's file stem.
    pub fn new(output_root: &Path, job_name: &str, template: &Path) -> Self {
        let scene_stem = template
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scene".to_string());
        Self {
            job_name: job_name.to_string(),
            job_dir: output_root.join(job_name),
            scene_stem,
        }
    }

    /// The job's output directory.
    pub fn job_dir(&self) -> &Path {
        &self.job_dir
    }

    /// Scene and image paths for one frame.
    pub fn frame_paths(&self, frame_id: i32) -> FramePaths {
        let base = format!(
            "{}_frame-{:0width$}",
            self.scene_stem,
            frame_id,
            width = FRAME_PAD_WIDTH
        );
        FramePaths {
            scene_file: self.job_dir.join(format!("{base}.pov")),
            image_file: self.job_dir.join(format!("{base}.png")),
        }
    }

    /// Numbered glob pattern covering every rendered image of the job, in
    /// the form the video assembler expects (`stem_frame-%04d.png`).
    pub fn image_pattern(&self) -> PathBuf {
        self.job_dir.join(format!(
            "{}_frame-%0{}d.png",
            self.scene_stem, FRAME_PAD_WIDTH
        ))
    }

    /// Path of the assembled video for the job.
    pub fn video_file(&self) -> PathBuf {
        self.job_dir.join(format!("{}.mp4", self.job_name))
    }

    /// Create the job directory if it does not already exist.
    pub async fn ensure_job_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.job_dir).await
    }
}
