//! Export plan construction

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::config::EncodeSettings;
use crate::domain::model::Project;
use crate::error::{ExportError, ExportResult};
use crate::planner::{ExportJob, ExportPlan, JobKind, TargetFormat};

/// Builds the ordered job list for an export request
pub struct PlanBuilder;

impl PlanBuilder {
    /// Create a new plan builder
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }

    /// Build the export plan for `project`.
    ///
    /// One extraction job per keep segment in playlist order, then a single
    /// concat job into `destination`. With a single source video the
    /// extractions stream-copy; with several they re-encode to a unified
    /// target format, since concatenation requires bit-stream compatible
    /// inputs. Fully-deleted videos contribute nothing. The concat list file
    /// is written as part of planning.
    pub fn build(
        &self,
        project: &mut Project,
        destination: &Path,
        work_dir: &Path,
        encode: &EncodeSettings,
    ) -> ExportResult<ExportPlan> {
        let transcode = project.videos.len() > 1;
        let target = Self::select_target(project, encode);

        info!(
            "Planning export of {} video(s) to {} ({})",
            project.videos.len(),
            destination.display(),
            if transcode {
                "unified re-encode"
            } else {
                "stream copy"
            }
        );

        std::fs::create_dir_all(work_dir)?;

        let mut jobs = Vec::new();
        let mut segment_outputs = Vec::new();
        for (v_idx, video) in project.videos.iter_mut().enumerate() {
            for (k_idx, keep) in video.keep_segments().into_iter().enumerate() {
                let output = work_dir.join(format!("clip_{:02}_{:03}.mp4", v_idx, k_idx));
                let kind = if transcode {
                    JobKind::TranscodeExtract { target }
                } else {
                    JobKind::CopyExtract
                };
                jobs.push(ExportJob {
                    kind,
                    input: video.path.clone(),
                    output: output.clone(),
                    window: Some(keep),
                    weight: keep.duration() as f64,
                });
                segment_outputs.push(output);
            }
        }

        if jobs.is_empty() {
            return Err(ExportError::EmptyPlan);
        }

        let list_file = work_dir.join("concat_list.txt");
        let mut list = std::fs::File::create(&list_file)?;
        for path in &segment_outputs {
            // Forward slashes keep the concat demuxer happy on every platform
            writeln!(list, "file '{}'", path.to_string_lossy().replace('\\', "/"))?;
        }

        jobs.push(ExportJob {
            kind: JobKind::Concat,
            input: list_file.clone(),
            output: destination.to_path_buf(),
            window: None,
            weight: 1.0,
        });

        info!("Planned {} job(s)", jobs.len());

        Ok(ExportPlan {
            jobs,
            work_dir: work_dir.to_path_buf(),
            segment_outputs,
            list_file,
            destination: destination.to_path_buf(),
        })
    }

    /// Pick the unified target geometry: the maximum width and height seen
    /// across inputs with known resolution, else the configured fallback
    fn select_target(project: &Project, encode: &EncodeSettings) -> TargetFormat {
        let mut width = 0;
        let mut height = 0;
        for video in &project.videos {
            if let Some(w) = video.width {
                width = width.max(w);
            }
            if let Some(h) = video.height {
                height = height.max(h);
            }
        }
        if width == 0 || height == 0 {
            width = encode.fallback_width;
            height = encode.fallback_height;
        }
        TargetFormat {
            width,
            height,
            fps: encode.fps,
        }
    }
}
