use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hb", about = concat!("hb v", env!("CARGO_PKG_VERSION"), " - weekly habits, one day at a time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a habits/ workspace in the current directory
    Init(InitArgs),
    /// Manage categories
    Category(CategoryCmd),
    /// Create a tracker
    Add(AddArgs),
    /// Show trackers due on a day
    List(ListArgs),
    /// Find trackers by name prefix
    Search(SearchArgs),
    /// Show one tracker
    Show(ShowArgs),
    /// Mark a tracker completed for a day
    Done(MarkArgs),
    /// Remove a day's completion
    Undo(MarkArgs),
    /// Set a config value (ui.language, completion.allow_future, store.file)
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Weekday and counter language (en, ru)
    #[arg(long)]
    pub language: Option<String>,
    /// Rewrite config.toml even if the workspace exists (the store is kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. ui.language
    pub key: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CategoryCmd {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Add {
        title: String,
    },
    /// Delete a category
    Rm {
        title: String,
        /// Also delete its trackers and their completions
        #[arg(long)]
        cascade: bool,
    },
    /// List categories with tracker counts
    List,
}

// ---------------------------------------------------------------------------
// Trackers
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Tracker name
    pub name: String,
    /// Category title (must exist)
    #[arg(long, short)]
    pub category: String,
    /// A single emoji
    #[arg(long, short)]
    pub emoji: String,
    /// Palette key
    #[arg(long, default_value = "color-1")]
    pub color: String,
    /// Weekdays: mon,wed,fri or daily. Omit for a tracker that is never due.
    #[arg(long, short, default_value = "")]
    pub days: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Day to show: YYYY-MM-DD, today, yesterday (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Show every category and tracker regardless of schedule
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Name prefix (case-insensitive)
    pub query: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Tracker id, id prefix, or exact name
    pub tracker: String,
}

#[derive(Args)]
pub struct MarkArgs {
    /// Tracker id, id prefix, or exact name
    pub tracker: String,
    /// Day: YYYY-MM-DD, today, yesterday (default: today)
    #[arg(long)]
    pub date: Option<String>,
}
