//! Command implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cli::args::{ClipArgs, ExportArgs, InspectArgs};
use crate::config::AppConfig;
use crate::domain::model::{Project, TimeRange, VideoItem};
use crate::engine::{ExportEvent, ExportOrchestrator};
use crate::planner::{ExportJob, JobKind, PlanBuilder};
use crate::probe::inspector::MediaInspector;
use crate::utils::path::{is_video_file, unique_output_path};
use crate::utils::time::{format_hms, parse_time};

/// Execute the export command
pub async fn export(args: ExportArgs, mut config: AppConfig) -> Result<()> {
    let inputs = collect_inputs(&args)?;
    if inputs.is_empty() {
        bail!("No input videos given; use --input or --input-dir");
    }

    if let Some(crf) = args.crf {
        config.encode.crf = crf;
    }
    if let Some(preset) = &args.preset {
        config.encode.preset = preset.clone();
    }
    if let Some(fps) = args.fps {
        config.encode.fps = fps;
    }

    let inspector = MediaInspector::new(&config.tools.ffprobe);
    let mut project = Project::new();
    for path in inputs {
        if !path.exists() {
            bail!("Input file does not exist: {}", path.display());
        }
        let media = inspector.probe(&path).await;
        if !media.has_known_duration() {
            warn!(
                "Could not determine duration of {}; delete ranges for it will be rejected",
                path.display()
            );
        }
        project.add_video(VideoItem::with_metadata(
            path,
            media.duration,
            media.width,
            media.height,
        ));
    }

    for spec in &args.delete {
        let (index, start, end) = parse_delete_spec(spec)?;
        let video = project
            .videos
            .get_mut(index)
            .with_context(|| format!("Delete spec '{}' references input {}", spec, index + 1))?;
        if video.duration == 0 {
            bail!(
                "Cannot apply '{}': duration of {} is unknown",
                spec,
                video.path.display()
            );
        }
        video.add_delete_range(start, end)?;
    }

    for video in &mut project.videos {
        let kept = video.total_kept();
        info!(
            "{}: keeping {} of {}",
            video.path.display(),
            format_hms(kept),
            format_hms(video.duration)
        );
    }
    if project.total_kept_duration() == 0 {
        bail!("Nothing to export: the delete ranges cover all input material");
    }

    let work_parent = args
        .work_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&work_parent)?;
    // The orchestrator owns removal of the working directory, so detach it
    // from the TempDir guard here
    #[allow(deprecated)]
    let work_dir = tempfile::Builder::new()
        .prefix("trimmerge_")
        .tempdir_in(&work_parent)?
        .into_path();

    let plan = PlanBuilder::new().build(&mut project, &args.output, &work_dir, &config.encode)?;
    info!(
        "Exporting {} segment(s) to {}",
        plan.segment_outputs.len(),
        plan.destination.display()
    );

    let orchestrator = ExportOrchestrator::new();
    let events = orchestrator.start_export(&plan, &config, args.keep_temp)?;
    cancel_on_ctrl_c(&orchestrator);
    drive_events(events).await
}

/// Execute the clip command
pub async fn clip(args: ClipArgs, config: AppConfig) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }
    let start = parse_time(&args.start)?;
    let end = parse_time(&args.end)?;
    if end <= start {
        bail!("End time ({}) must be after start time ({})", args.end, args.start);
    }

    let output = match args.output {
        Some(output) => output,
        None => unique_output_path(&default_clip_output(&args.input, start, end)),
    };
    info!(
        "Clipping {} [{} - {}] to {}",
        args.input.display(),
        format_hms(start),
        format_hms(end),
        output.display()
    );

    let job = ExportJob {
        kind: JobKind::CopyExtract,
        input: args.input,
        output,
        window: Some(TimeRange::new(start, end)),
        weight: (end - start) as f64,
    };

    let orchestrator = ExportOrchestrator::new();
    let events = orchestrator.start_single_job(&job, &config)?;
    cancel_on_ctrl_c(&orchestrator);
    drive_events(events).await
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, config: AppConfig) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }
    let media = MediaInspector::new(&config.tools.ffprobe)
        .probe(&args.input)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&media)?);
        return Ok(());
    }

    let duration = if media.has_known_duration() {
        format_hms(media.duration)
    } else {
        "unknown".to_string()
    };
    let resolution = match (media.width, media.height) {
        (Some(w), Some(h)) => format!("{}x{}", w, h),
        _ => "unknown".to_string(),
    };
    println!("File:       {}", args.input.display());
    println!("Duration:   {}", duration);
    println!("Resolution: {}", resolution);
    Ok(())
}

/// Gather explicit inputs plus any videos found in --input-dir
fn collect_inputs(args: &ExportArgs) -> Result<Vec<PathBuf>> {
    let mut inputs = args.input.clone();
    if let Some(dir) = &args.input_dir {
        if !dir.is_dir() {
            bail!("--input-dir is not a directory: {}", dir.display());
        }
        for entry in WalkDir::new(dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_video_file(entry.path()) {
                inputs.push(entry.path().to_path_buf());
            }
        }
    }
    Ok(inputs)
}

/// Parse a VIDEO:START-END delete spec into a 0-based index and endpoints
fn parse_delete_spec(spec: &str) -> Result<(usize, u64, u64)> {
    let (index_part, range_part) = spec
        .split_once(':')
        .with_context(|| format!("Delete spec '{}' must look like VIDEO:START-END", spec))?;
    let number: usize = index_part
        .trim()
        .parse()
        .with_context(|| format!("Delete spec '{}' has an invalid video number", spec))?;
    if number == 0 {
        bail!("Delete spec '{}': video numbers start at 1", spec);
    }
    let (start_part, end_part) = range_part
        .split_once('-')
        .with_context(|| format!("Delete spec '{}' must look like VIDEO:START-END", spec))?;
    let start = parse_time(start_part)?;
    let end = parse_time(end_part)?;
    Ok((number - 1, start, end))
}

fn default_clip_output(input: &Path, start: u64, end: u64) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    input.with_file_name(format!("{}_clip_{}_{}.{}", stem, start, end, extension))
}

/// Register a Ctrl-C handler that cancels the active export
fn cancel_on_ctrl_c(orchestrator: &ExportOrchestrator) {
    let orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested");
            orchestrator.cancel();
        }
    });
}

/// Print progress and wait for the terminal event
async fn drive_events(mut events: UnboundedReceiver<ExportEvent>) -> Result<()> {
    while let Some(event) = events.recv().await {
        match event {
            ExportEvent::Progress(ratio) => {
                print!("\rProgress: {:5.1}%", ratio * 100.0);
                let _ = std::io::stdout().flush();
            }
            ExportEvent::Message(message) => debug!("{}", message),
            ExportEvent::Finished { success, message } => {
                println!();
                if success {
                    info!("{}", message);
                    return Ok(());
                }
                bail!(message);
            }
        }
    }
    bail!("Export ended without reporting a result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delete_spec_plain_seconds() {
        assert_eq!(parse_delete_spec("1:10-20").unwrap(), (0, 10, 20));
    }

    #[test]
    fn test_parse_delete_spec_clock_times() {
        assert_eq!(
            parse_delete_spec("2:00:10-01:30").unwrap(),
            (1, 10, 90)
        );
        assert_eq!(
            parse_delete_spec("3:1:00:00-1:00:30").unwrap(),
            (2, 3600, 3630)
        );
    }

    #[test]
    fn test_parse_delete_spec_rejects_malformed() {
        assert!(parse_delete_spec("10-20").is_err());
        assert!(parse_delete_spec("0:10-20").is_err());
        assert!(parse_delete_spec("x:10-20").is_err());
        assert!(parse_delete_spec("1:1020").is_err());
        assert!(parse_delete_spec("1:abc-20").is_err());
    }

    #[test]
    fn test_default_clip_output() {
        let path = default_clip_output(Path::new("/videos/movie.mkv"), 5, 25);
        assert_eq!(path, Path::new("/videos/movie_clip_5_25.mkv"));
    }
}
