use std::path::PathBuf;

use colored::Colorize;

use batchmark_core::{action, naming, print_success, Config};
use batchmark_webclient::SubmissionFile;

use super::{GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// A directory of submissions (filtered by the configured include
    /// glob), or explicit file paths.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Assignment to grade against.
    #[arg(short, long)]
    pub assignment: String,

    /// Keep watching the created job until it reaches a terminal state.
    #[arg(short, long)]
    pub watch: bool,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = Config::from_file_finding_in_ancestors(util::current_dir())?;

    let files = if args.paths.len() == 1 && args.paths[0].is_dir() {
        action::collect_submission_files(&args.paths[0], &cfg.submit)?
    } else {
        action::read_submission_files(&args.paths)?
    };

    print_preview(&files);

    let cli = util::build_client(&cfg, global_args);
    let receipt = action::submit_batch(cli.as_ref(), &files, &args.assignment).await?;

    if (receipt.valid_files as usize) < files.len() {
        println!(
            "{}",
            format!(
                "Server accepted {} of {} files; the rest were rejected as invalid.",
                receipt.valid_files,
                files.len()
            )
            .yellow()
        );
    }
    print_success!(
        "Created batch job {} ({} files accepted)",
        receipt.batch_job_id,
        receipt.valid_files
    );

    if args.watch {
        let job = action::watch_job(cli, &receipt.batch_job_id).await?;
        action::print_job_summary(&job);
        println!(
            "\nSee per-student results with:\n  {}",
            format!("bmk results {}", receipt.batch_job_id).cyan()
        );
    } else {
        println!(
            "Track progress with:\n  {}",
            format!("bmk watch {}", receipt.batch_job_id).cyan()
        );
    }
    Ok(())
}

fn print_preview(files: &[SubmissionFile]) {
    println!("{} files ready for batch grading", files.len());
    for file in files.iter().take(10) {
        println!(
            "  {:<32} {:<24} {}",
            file.file_name,
            naming::student_name_from_filename(&file.file_name),
            util::format_file_size(file.contents.len()).dimmed(),
        );
    }
    if files.len() > 10 {
        println!("  ... and {} more files", files.len() - 10);
    }
}
