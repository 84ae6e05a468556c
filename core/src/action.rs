pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use crossterm::terminal;
use error::*;
use indicatif::{ProgressBar, ProgressStyle};

use batchmark_webclient::{
    Assignment, BatchJob, BatchReceipt, BatchResults, Client, JobStatusPoller, OutcomeRecord,
    PollEnd, SubmissionFile,
};

use crate::analytics::{self, ErrorClassifier, FeedbackSummary};
use crate::config::SubmitConfig;
use crate::export::{self, ExportMode};
use crate::style::{self, ColorTheme as _};

/// Collect the files of one submission dir, in filename order, reading
/// everything the configured include glob matches.
pub fn collect_submission_files(
    dir: impl AsRef<Path>,
    cfg: &SubmitConfig,
) -> Result<Vec<SubmissionFile>> {
    let dir = dir.as_ref();
    let paths = fsutil::find_files_matching_glob(dir, &cfg.include)
        .with_context(|| format!("No submission files in {:?}", dir))?;
    self::read_submission_files(&paths)
}

pub fn read_submission_files(paths: &[PathBuf]) -> Result<Vec<SubmissionFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = fsutil::read(path)?;
        let file_name = path
            .file_name()
            .with_context(|| format!("Not a file path: {:?}", path))?
            .to_string_lossy()
            .into_owned();
        files.push(SubmissionFile {
            file_name,
            contents,
        });
    }
    Ok(files)
}

pub async fn submit_batch(
    cli: &dyn Client,
    files: &[SubmissionFile],
    assignment_id: &str,
) -> Result<BatchReceipt> {
    ensure!(!files.is_empty(), "No files to submit");

    let receipt = cli
        .submit_batch(files, assignment_id)
        .await
        .with_context(|| format!("Failed to submit batch for assignment '{}'", assignment_id))?;

    if (receipt.valid_files as usize) < files.len() {
        log::warn!(
            "Server accepted {} of {} uploaded files",
            receipt.valid_files,
            files.len()
        );
    }
    Ok(receipt)
}

/// Poll the job until a terminal snapshot, rendering progress. A failed
/// status fetch ends the watch but deliberately does NOT mark the job
/// failed: the server may still be grading.
pub async fn watch_job(cli: Arc<dyn Client>, job_id: &str) -> Result<BatchJob> {
    let handle = JobStatusPoller::new(cli, job_id).start();
    let mut snapshots = handle.snapshots();

    let bar = ProgressBar::new(100).with_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:40}] {pos:>3}% {msg}")
            .unwrap(),
    );
    bar.set_message("waiting for first status ...");

    let updater = async {
        while snapshots.changed().await.is_ok() {
            let Some(job) = snapshots.borrow().clone() else {
                continue;
            };
            bar.set_position(job.progress_percentage.round() as u64);
            bar.set_message(format!(
                "{}/{} processed ({} ok, {} failed)",
                job.processed_files, job.total_files, job.successful_grades, job.failed_grades
            ));
        }
    };

    let (_, end) = tokio::join!(updater, handle.wait());
    match end {
        PollEnd::Terminal(job) => {
            bar.finish_with_message(job.status.to_string());
            Ok(*job)
        }
        PollEnd::FetchFailed(e) => {
            bar.abandon_with_message("status fetch failed");
            Err(Error::new(e)
                .context("Stopped watching the job; it may still be processing server-side"))
        }
        PollEnd::Cancelled => bail!("Polling was cancelled"),
    }
}

pub async fn fetch_status(cli: &dyn Client, job_id: &str) -> Result<BatchJob> {
    cli.fetch_status(job_id)
        .await
        .with_context(|| format!("Failed to fetch status of batch job '{}'", job_id))
}

pub async fn fetch_results(cli: &dyn Client, job_id: &str) -> Result<BatchResults> {
    cli.fetch_results(job_id)
        .await
        .with_context(|| format!("Failed to fetch results of batch job '{}'", job_id))
}

pub async fn list_batches(cli: &dyn Client) -> Result<Vec<BatchJob>> {
    cli.list_batches().await.context("Failed to list batch jobs")
}

pub async fn list_assignments(cli: &dyn Client) -> Result<Vec<Assignment>> {
    cli.list_assignments()
        .await
        .context("Failed to list assignments")
}

/// Write the CSV artifact for an already filtered/sorted view.
pub fn export_view(
    records: &[&OutcomeRecord],
    mode: ExportMode,
    job_id: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    let csv = export::encode(records, mode);
    let path = out_dir.join(export::artifact_filename(job_id, mode));
    fsutil::write_with_mkdir(&path, &csv)?;
    log::info!("Wrote {} export ({} rows) to {:?}", mode, records.len(), path);
    Ok(path)
}

pub fn print_job_summary(job: &BatchJob) {
    println!(
        "\n{} {}",
        job.assignment_name.bold(),
        style::status_badge(job.status),
    );

    let fmt_score = |s: Option<f64>| s.map(|x| format!("{:.1}%", x)).unwrap_or("-".into());
    println!(
        "  files: {}   graded: {}   failed: {}",
        job.total_files,
        job.successful_grades.to_string().green(),
        if job.failed_grades > 0 {
            job.failed_grades.to_string().red()
        } else {
            job.failed_grades.to_string().normal()
        },
    );
    println!(
        "  avg: {}   median: {}   highest: {}   lowest: {}",
        fmt_score(job.average_score),
        fmt_score(job.median_score),
        fmt_score(job.highest_score),
        fmt_score(job.lowest_score),
    );
    if let Some(total) = job.processing_time_total {
        println!("  total processing time: {:.0}m", total / 60.0);
    }
    if let Some(err) = &job.error_message {
        println!("  {}", err.bright_red());
    }
}

pub fn print_analytics(job: &BatchJob, records: &[OutcomeRecord]) {
    let (cols, _) = terminal::size().unwrap_or((80, 40));
    let bar_width = (cols as usize / 3).max(10);

    println!("\n{}", "Grade distribution".cyan().bold());
    let dist = analytics::grade_distribution(records);
    let max = dist.max_count();
    for (bucket, count) in dist.iter() {
        let filled = if max == 0 { 0 } else { count * bar_width / max };
        println!(
            "  {:<12} {}{} {}",
            style::bucket_label(bucket),
            "█".repeat(filled).color(bucket.color()),
            " ".repeat(bar_width - filled),
            count,
        );
    }

    println!("\n{}", "Error analysis".cyan().bold());
    let taxonomy = analytics::error_taxonomy(records, &ErrorClassifier::default());
    if taxonomy.is_empty() {
        println!("  {}", "No errors detected in this batch".green());
    } else {
        for (category, count) in &taxonomy {
            println!(
                "  {} {} occurrence{}",
                category.red(),
                count,
                if *count != 1 { "s" } else { "" },
            );
        }
    }

    println!("\n{}", "Feedback summary".cyan().bold());
    match analytics::feedback_summary(records) {
        FeedbackSummary::NothingToAnalyze => {
            println!("  No graded submissions to analyze");
        }
        FeedbackSummary::StrongPerformance => {
            println!("  {}", "Strong performance across all areas".green());
        }
        FeedbackSummary::NeedsAttention(flags) => {
            for flag in flags {
                println!(
                    "  {} need {} improvements",
                    format!("{}%", flag.percent).bold().yellow(),
                    flag.area,
                );
            }
        }
    }

    println!("\n{}", "Processing insights".cyan().bold());
    let insights = analytics::processing_insights(job, records);
    println!(
        "  average processing time: {:.1}s",
        insights.average_processing_time
    );
    println!("  success rate: {:.1}%", insights.success_rate);
    if let Some(rate) = insights.compilation_success_rate {
        println!("  compilation rate: {:.1}%", rate);
    }
    match &job.completed_at {
        Some(t) => println!(
            "  completed: {}",
            t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("  completed: in progress"),
    }
}

pub fn print_results_table(records: &[&OutcomeRecord]) {
    if records.is_empty() {
        println!("{}", "No results match your filters".dimmed());
        return;
    }

    println!(
        "\n  {:<24} {:<28} {:>6} {:>6} {:>6} {:>6}",
        "STUDENT".dimmed(),
        "FILE".dimmed(),
        "SCORE".dimmed(),
        "STYLE".dimmed(),
        "EFF".dimmed(),
        "DOCS".dimmed(),
    );

    let fmt_sub = |s: Option<i64>| s.map(|x| x.to_string()).unwrap_or("-".into());
    for record in records {
        let details = record.grading_details.as_ref();
        println!(
            "{} {:<24} {:<28} {:>6} {:>6} {:>6} {:>6}",
            style::record_marker(record.status),
            truncate(&record.student_name, 24),
            truncate(&record.file_name, 28).dimmed(),
            record
                .percentage
                .map(|p| format!("{:.0}%", p))
                .unwrap_or("-".into()),
            fmt_sub(details.map(|d| d.code_style_score)),
            fmt_sub(details.map(|d| d.efficiency_score)),
            fmt_sub(details.map(|d| d.documentation_score)),
        );
    }
}

pub fn print_batch_list(jobs: &[BatchJob]) {
    if jobs.is_empty() {
        println!("No batch jobs yet");
        return;
    }
    for job in jobs {
        println!(
            "{}  {}  {} {}  ({}/{} ok, {} failed)",
            job.created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            job.id.dimmed(),
            job.assignment_name.bold(),
            style::status_badge(job.status),
            job.successful_grades,
            job.total_files,
            job.failed_grades,
        );
    }
}

pub fn print_assignments(assignments: &[Assignment]) {
    if assignments.is_empty() {
        println!("No assignments configured on the server");
        return;
    }
    for a in assignments {
        println!(
            "{}  {} (max {} pts)",
            a.id.dimmed(),
            a.name.bold(),
            a.max_score,
        );
        if !a.description.is_empty() {
            println!("    {}", a.description.dimmed());
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
