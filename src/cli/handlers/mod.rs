mod init;
pub use init::cmd_init;

use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store::{StoreError, TrackerRepository};
use crate::io::workspace_io::{self, Workspace};
use crate::model::tracker::{Tracker, TrackerId};
use crate::model::weekday::{parse_schedule, weekday_index};
use crate::ops::draft::TrackerDraft;
use crate::ops::ledger::{LedgerError, completion_label, is_completable};
use crate::ops::visibility::{trackers_matching_prefix, trackers_scheduled_on};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Minimum length of an id prefix accepted in place of a full id.
const MIN_ID_PREFIX: usize = 4;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let base = match cli.dir {
        Some(ref dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    tracing::debug!(base = %base.display(), json, "dispatching");

    match cli.command {
        Commands::Init(args) => cmd_init(args, &base),
        Commands::Category(cmd) => cmd_category(cmd, &base, json),
        Commands::Add(args) => cmd_add(args, &base),
        Commands::List(args) => cmd_list(args, &base, json),
        Commands::Search(args) => cmd_search(args, &base, json),
        Commands::Show(args) => cmd_show(args, &base, json),
        Commands::Done(args) => cmd_done(args, &base),
        Commands::Undo(args) => cmd_undo(args, &base),
        Commands::Config(args) => cmd_config(args, &base),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_workspace_from(base: &Path) -> Result<Workspace, workspace_io::WorkspaceError> {
    let root = workspace_io::discover_workspace(base)?;
    workspace_io::load_workspace(&root)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse `YYYY-MM-DD`, `today` or `yesterday`. `None` means today.
fn parse_day(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate, String> {
    match arg.map(str::trim) {
        None | Some("today") => Ok(today),
        Some("yesterday") => today.pred_opt().ok_or_else(|| "date out of range".to_string()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("invalid date \"{}\" (expected YYYY-MM-DD)", s)),
    }
}

/// Find a tracker by full id, id prefix, or exact (case-insensitive) name.
fn resolve_tracker<'a>(ws: &'a Workspace, query: &str) -> Result<(&'a str, &'a Tracker), String> {
    let query = query.trim();
    if let Ok(id) = query.parse::<TrackerId>() {
        return ws
            .store
            .find_tracker(id)
            .ok_or_else(|| format!("tracker not found: {}", id));
    }

    let lowered = query.to_lowercase();
    let prefix = lowered.replace('-', "");
    let by_prefix = prefix.len() >= MIN_ID_PREFIX && prefix.chars().all(|c| c.is_ascii_hexdigit());
    let matches: Vec<(&str, &Tracker)> = ws
        .store
        .trackers()
        .filter(|(_, t)| {
            t.name.to_lowercase() == lowered
                || (by_prefix && t.id.as_uuid().simple().to_string().starts_with(&prefix))
        })
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no tracker matches \"{}\"", query)),
        [single] => Ok(*single),
        many => {
            let names: Vec<String> = many
                .iter()
                .map(|(_, t)| format!("{} ({})", t.name, t.id.short()))
                .collect();
            Err(format!("\"{}\" is ambiguous: {}", query, names.join(", ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

fn cmd_category(cmd: CategoryCmd, base: &Path, json: bool) -> CmdResult {
    let mut ws = load_workspace_from(base)?;
    match cmd.action {
        CategoryAction::Add { title } => {
            ws.store.create_category(&title)?;
            println!("Created category {}", title.trim());
        }
        CategoryAction::Rm { title, cascade } => {
            if cascade {
                let removed = ws.store.delete_category_cascade(&title)?;
                println!("Deleted category {} and {} tracker(s)", title, removed);
            } else {
                match ws.store.delete_category(&title) {
                    Err(StoreError::CategoryNotEmpty { count, .. }) => {
                        return Err(format!(
                            "category {} still has {} tracker(s); use --cascade to delete them too",
                            title, count
                        )
                        .into());
                    }
                    other => other?,
                }
                println!("Deleted category {}", title);
            }
        }
        CategoryAction::List => {
            let categories = ws.store.fetch_all_categories();
            if json {
                let summary: Vec<CategorySummaryJson> = categories
                    .iter()
                    .map(|c| CategorySummaryJson {
                        title: c.title.clone(),
                        trackers: c.trackers.len(),
                    })
                    .collect();
                println!("{}", to_json(&summary));
            } else if categories.is_empty() {
                println!("No categories yet. Create one with `hb category add <title>`.");
            } else {
                for c in &categories {
                    println!("{} ({})", c.title, c.trackers.len());
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Trackers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, base: &Path) -> CmdResult {
    let mut ws = load_workspace_from(base)?;
    let schedule = parse_schedule(&args.days)?;

    let mut draft = TrackerDraft::new();
    draft
        .set_name(args.name.trim())
        .set_color(args.color)
        .set_emoji(args.emoji.trim())
        .set_schedule(schedule)
        .set_category(args.category);

    let Some((tracker, category)) = draft.build() else {
        let missing: Vec<String> = draft.missing_fields().iter().map(|f| f.to_string()).collect();
        return Err(format!("tracker is incomplete, missing: {}", missing.join(", ")).into());
    };
    let summary = format!("{} {} ({})", tracker.emoji, tracker.name, tracker.id.short());
    ws.store.create_tracker(tracker, &category)?;
    draft.reset();
    println!("Added {} to {}", summary, category);
    Ok(())
}

fn cmd_list(args: ListArgs, base: &Path, json: bool) -> CmdResult {
    let ws = load_workspace_from(base)?;
    let language = ws.config.ui.language;
    let date = parse_day(args.date.as_deref(), today())?;
    let all = ws.store.fetch_all_categories();
    let visible = if args.all {
        all
    } else {
        trackers_scheduled_on(&all, date)
    };

    if json {
        let day = DayJson {
            date,
            weekday: weekday_index(date),
            categories: categories_to_json(&visible, ws.store.ledger(), language, Some(date)),
        };
        println!("{}", to_json(&day));
        return Ok(());
    }

    let day_name = language.weekday_names()[weekday_index(date) as usize];
    println!("{} {}", date, day_name);
    println!();
    if ws.store.is_empty() && !args.all {
        println!("Nothing tracked yet. Add a tracker with `hb add`.");
    } else if visible.is_empty() {
        println!("No trackers scheduled for this day.");
    } else {
        println!(
            "{}",
            format_categories(&visible, ws.store.ledger(), language, Some(date))
        );
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, base: &Path, json: bool) -> CmdResult {
    let ws = load_workspace_from(base)?;
    let language = ws.config.ui.language;
    let found = trackers_matching_prefix(&ws.store.fetch_all_categories(), &args.query);

    if json {
        println!(
            "{}",
            to_json(&categories_to_json(&found, ws.store.ledger(), language, None))
        );
    } else if found.is_empty() {
        println!("Nothing found.");
    } else {
        println!("{}", format_categories(&found, ws.store.ledger(), language, None));
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, base: &Path, json: bool) -> CmdResult {
    let ws = load_workspace_from(base)?;
    let language = ws.config.ui.language;
    let today = today();
    let (category, tracker) = resolve_tracker(&ws, &args.tracker)?;

    if json {
        let out = TrackerWithCategoryJson {
            category: category.to_string(),
            tracker: tracker_to_json(tracker, ws.store.ledger(), language, Some(today)),
        };
        println!("{}", to_json(&out));
    } else {
        println!(
            "{}",
            format_tracker_details(tracker, category, ws.store.ledger(), language, today)
        );
    }
    Ok(())
}

fn cmd_done(args: MarkArgs, base: &Path) -> CmdResult {
    let mut ws = load_workspace_from(base)?;
    let today = today();
    let date = parse_day(args.date.as_deref(), today)?;
    let (id, label) = {
        let (_, tracker) = resolve_tracker(&ws, &args.tracker)?;
        (tracker.id, format!("{} {}", tracker.emoji, tracker.name))
    };

    if !ws.config.completion.allow_future && !is_completable(date, today) {
        tracing::warn!(%id, %date, "refusing future completion");
        return Err(format!("cannot complete {} in the future", date).into());
    }

    match ws.store.mark_completed(id, date) {
        Ok(()) => {
            let total = ws.store.ledger().total_completions(id);
            println!(
                "[x] {} on {} ({})",
                label,
                date,
                completion_label(total, ws.config.ui.language)
            );
        }
        Err(StoreError::Ledger(LedgerError::DuplicateCompletion { .. })) => {
            println!("{} is already done on {}", label, date);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn cmd_undo(args: MarkArgs, base: &Path) -> CmdResult {
    let mut ws = load_workspace_from(base)?;
    let date = parse_day(args.date.as_deref(), today())?;
    let (id, label) = {
        let (_, tracker) = resolve_tracker(&ws, &args.tracker)?;
        (tracker.id, format!("{} {}", tracker.emoji, tracker.name))
    };

    if ws.store.unmark_completed(id, date)? {
        let total = ws.store.ledger().total_completions(id);
        println!(
            "[ ] {} on {} ({})",
            label,
            date,
            completion_label(total, ws.config.ui.language)
        );
    } else {
        println!("{} was not done on {}", label, date);
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, base: &Path) -> CmdResult {
    let ws = load_workspace_from(base)?;
    let (_, mut doc) = config_io::read_config(&ws.habits_dir)?;
    config_io::set_value(&mut doc, &args.key, &args.value)?;
    config_io::write_config(&ws.habits_dir, &doc)?;
    tracing::info!(key = %args.key, value = %args.value, "config updated");
    println!("{} = {}", args.key, args.value);
    Ok(())
}
