use batchmark_core::{action, view, Config};

use super::{FilterArgs, GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub job_id: String,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = Config::from_file_finding_in_ancestors(util::current_dir())?;
    let cli = util::build_client(&cfg, global_args);

    let results = action::fetch_results(cli.as_ref(), &args.job_id).await?;

    action::print_job_summary(&results.batch_job);
    action::print_analytics(&results.batch_job, &results.results);

    let displayed = view::apply(&results.results, &args.filter.to_filter_state());
    action::print_results_table(&displayed);
    Ok(())
}
