pub mod assignments;
pub mod export;
pub mod history;
pub mod init;
pub mod results;
pub mod status;
pub mod submit;
pub mod watch;

use batchmark_core::analytics::GradeBucket;
use batchmark_core::view::{FilterState, GradeFilter, SortField, SortOrder, StatusFilter};
use batchmark_webclient::RecordStatus;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Bearer token for the grading server (overrides config file and
    /// the BATCHMARK_TOKEN env var).
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Assignments(assignments::Args),
    Export(export::Args),
    History(history::Args),
    Init(init::Args),
    Status(status::Args),

    #[command(alias("r"))]
    Results(results::Args),

    #[command(alias("s"))]
    Submit(submit::Args),

    #[command(alias("w"))]
    Watch(watch::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Assignments(args) => assignments::exec(args, self).await,
            Export(args) => export::exec(args, self).await,
            History(args) => history::exec(args, self).await,
            Init(args) => init::exec(args, self),
            Results(args) => results::exec(args, self).await,
            Status(args) => status::exec(args, self).await,
            Submit(args) => submit::exec(args, self).await,
            Watch(args) => watch::exec(args, self).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgStatus {
    Pending,
    Grading,
    Graded,
    Error,
}

impl From<ArgStatus> for RecordStatus {
    fn from(value: ArgStatus) -> Self {
        use ArgStatus::*;
        match value {
            Pending => RecordStatus::Pending,
            Grading => RecordStatus::Grading,
            Graded => RecordStatus::Graded,
            Error => RecordStatus::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgGrade {
    A,
    B,
    C,
    D,
    F,
}

impl From<ArgGrade> for GradeBucket {
    fn from(value: ArgGrade) -> Self {
        use ArgGrade::*;
        match value {
            A => GradeBucket::A,
            B => GradeBucket::B,
            C => GradeBucket::C,
            D => GradeBucket::D,
            F => GradeBucket::F,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgSortField {
    Name,
    Score,
    Status,
}

impl From<ArgSortField> for SortField {
    fn from(value: ArgSortField) -> Self {
        use ArgSortField::*;
        match value {
            Name => SortField::Name,
            Score => SortField::Score,
            Status => SortField::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgSortOrder {
    Asc,
    Desc,
}

impl From<ArgSortOrder> for SortOrder {
    fn from(value: ArgSortOrder) -> Self {
        use ArgSortOrder::*;
        match value {
            Asc => SortOrder::Asc,
            Desc => SortOrder::Desc,
        }
    }
}

/// View options shared by `results` and `export`.
#[derive(Debug, clap::Args)]
pub struct FilterArgs {
    /// Substring match against student name or file name.
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long)]
    pub status: Option<ArgStatus>,

    #[arg(long)]
    pub grade: Option<ArgGrade>,

    #[arg(long, default_value = "name")]
    pub sort: ArgSortField,

    #[arg(long, default_value = "asc")]
    pub order: ArgSortOrder,
}

impl FilterArgs {
    pub fn to_filter_state(&self) -> FilterState {
        FilterState {
            search_term: self.search.clone(),
            status: match self.status {
                Some(status) => StatusFilter::Only(status.into()),
                None => StatusFilter::All,
            },
            grade: match self.grade {
                Some(grade) => GradeFilter::Only(grade.into()),
                None => GradeFilter::All,
            },
            sort_field: self.sort.into(),
            sort_order: self.order.into(),
        }
    }
}
