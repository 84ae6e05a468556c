use batchmark_core::{action, Config};

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

    let job = action::fetch_status(cli.as_ref(), &args.job_id).await?;
    action::print_job_summary(&job);
    println!(
        "  progress: {:.0}% ({}/{} files)",
        job.progress_percentage, job.processed_files, job.total_files
    );
    Ok(())
}
