use batchmark_core::{action, Config};

use super::{GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {}

pub async fn exec(_: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = Config::from_file_finding_in_ancestors(util::current_dir())?;
    let cli = util::build_client(&cfg, global_args);

    let assignments = action::list_assignments(cli.as_ref()).await?;
    action::print_assignments(&assignments);
    Ok(())
}
