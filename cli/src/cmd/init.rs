use anyhow::ensure;
use batchmark_core::{print_success, Config};
use std::path::PathBuf;

use super::{GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let filepath = args.dir.join(Config::FILENAME);
    ensure!(
        !filepath.is_file(),
        "'{}' already exists",
        filepath.to_string_lossy()
    );

    fsutil::write_with_mkdir(&filepath, Config::example_toml())?;
    print_success!(
        "Successfully initialized batchmark dir. (config: {})",
        filepath.to_string_lossy()
    );
    Ok(())
}
