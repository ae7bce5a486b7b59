use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::workspace_io;
use crate::model::weekday::Language;

const CONFIG_TEMPLATE: &str = r##"# habits workspace configuration

[ui]
# Weekday names and completion counters: "en" or "ru"
language = "{language}"

[completion]
# Allow marking days after today as done
allow_future = false

[store]
# Store document, relative to this directory
file = "store.json"
"##;

fn render_config(language: Language) -> String {
    CONFIG_TEMPLATE.replace("{language}", language.code())
}

pub fn cmd_init(args: InitArgs, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let language = match args.language.as_deref() {
        None => Language::default(),
        Some(s) => Language::parse(s).ok_or_else(|| format!("unknown language \"{}\" (use en or ru)", s))?,
    };

    // Warn when nesting inside another workspace
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = workspace_io::discover_workspace(parent)
    {
        eprintln!(
            "Note: parent workspace found at {}/",
            parent_root.join(workspace_io::HABITS_DIR).display()
        );
    }

    let habits_dir = workspace_io::init_workspace(root, &render_config(language), args.force)?;
    println!("Initialized habits workspace in {}/", habits_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::HabitsConfig;

    #[test]
    fn template_parses() {
        let config: HabitsConfig = toml::from_str(&render_config(Language::Ru)).unwrap();
        assert_eq!(config.ui.language, Language::Ru);
        assert!(!config.completion.allow_future);
        assert_eq!(config.store.file, "store.json");
    }
}
