//! Show command - displays configuration and build state.

use anyhow::Result;

use crate::cache::{self, DirState};
use crate::config::Config;
use crate::project::Project;
use crate::store::ConfigurationStore;

/// Show target for the show command.
pub enum ShowTarget {
    /// Paths and the persisted configuration
    Config,
    /// Per-extension build directory state
    Status,
}

/// Execute the show command.
pub fn cmd_show(config: &Config, project: Option<&Project>, target: ShowTarget) -> Result<()> {
    let store = ConfigurationStore::new(&config.config_file);
    match target {
        ShowTarget::Config => {
            config.print();
            println!();
            match store.load() {
                Ok(resolved) => {
                    println!("Stored configuration:");
                    for (key, value) in resolved.iter() {
                        println!("  {} = {}", key, value.unwrap_or("(unset)"));
                    }
                }
                Err(e) => println!("Stored configuration: none ({})", e),
            }
        }
        ShowTarget::Status => {
            let Some(project) = project else {
                anyhow::bail!("No project descriptor at {}", config.project_file.display());
            };
            let config_time = store.modified().ok();
            if config_time.is_none() {
                println!("Not configured. Run 'extforge configure' first.\n");
            }
            println!("Extensions:");
            for ext in &project.extensions {
                let dir = config.build_temp.join(ext.library_name());
                let state = match config_time {
                    Some(time) => cache::dir_state(&dir, time).label(),
                    None if dir.exists() => "present",
                    None => DirState::Missing.label(),
                };
                println!("  {} [{}]: {}", ext.name, dir.display(), state);
            }
        }
    }
    Ok(())
}
