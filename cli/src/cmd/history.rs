use batchmark_core::{action, Config};

use super::{GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {}

pub async fn exec(_: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = Config::from_file_finding_in_ancestors(util::current_dir())?;
    let cli = util::build_client(&cfg, global_args);

    let jobs = action::list_batches(cli.as_ref()).await?;
    action::print_batch_list(&jobs);
    Ok(())
}
