use std::path::PathBuf;

use batchmark_core::export::ExportMode;
use batchmark_core::{action, print_success, view, Config};

use super::{FilterArgs, GlobalArgs, SubcmdResult};
use crate::util;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub job_id: String,

    /// Include per-criterion scores, feedback, and error messages.
    #[arg(short, long)]
    pub detailed: bool,

    /// Output dir (defaults to `export.dir` from the config).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = Config::from_file_finding_in_ancestors(util::current_dir())?;
    let cli = util::build_client(&cfg, global_args);

    let results = action::fetch_results(cli.as_ref(), &args.job_id).await?;
    let displayed = view::apply(&results.results, &args.filter.to_filter_state());

    let mode = if args.detailed {
        ExportMode::Detailed
    } else {
        ExportMode::Summary
    };
    let out_dir = args.out.clone().unwrap_or_else(|| cfg.export.dir.clone());

    let path = action::export_view(&displayed, mode, &args.job_id, &out_dir)?;
    print_success!(
        "Exported {} rows to {}",
        displayed.len(),
        util::replace_homedir_to_tilde(path).to_string_lossy()
    );
    Ok(())
}
