use colored::Colorize;

use batchmark_core::{action, Config};
use batchmark_webclient::JobStatus;

use super::{GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub job_id: String,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = Config::from_file_finding_in_ancestors(util::current_dir())?;
    let cli = util::build_client(&cfg, global_args);

    let job = action::watch_job(cli, &args.job_id).await?;
    action::print_job_summary(&job);

    if job.status == JobStatus::Completed && job.failed_grades > 0 {
        println!(
            "{}",
            format!(
                "{} submission(s) failed; check the detailed results.",
                job.failed_grades
            )
            .yellow()
        );
    }
    println!(
        "\nSee per-student results with:\n  {}",
        format!("bmk results {}", args.job_id).cyan()
    );
    Ok(())
}
