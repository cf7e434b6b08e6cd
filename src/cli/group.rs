//! Group CLI commands
//!
//! `list [-t]` and `rm <group|*>`.

use crate::cli::prompt::Prompt;
use crate::config::PeridotPaths;
use crate::display::format_group_list;
use crate::error::PeridotResult;
use crate::groups::{self, Confirm, ListMode, Preconfirmed, RemoveOutcome};
use crate::storage::ArchiveStore;

/// Handle `list`
pub fn handle_list(paths: &PeridotPaths, detailed: bool) -> PeridotResult<()> {
    let store = ArchiveStore::new(paths.archive_file());
    let Some(archive) = store.load_existing()? else {
        println!("The archive does not exist: {}", store.path().display());
        return Ok(());
    };

    let mode = if detailed {
        ListMode::Detailed
    } else {
        ListMode::TopLevel
    };
    println!("{}", format_group_list(&groups::list(&archive, mode)).trim_end());
    Ok(())
}

/// Handle `rm <group|*>`
pub fn handle_remove(paths: &PeridotPaths, group: &str, force: bool) -> PeridotResult<()> {
    let store = ArchiveStore::new(paths.archive_file());

    let mut confirm: Box<dyn Confirm> = if force {
        Box::new(Preconfirmed(true))
    } else {
        Box::new(Prompt::stdio())
    };

    match groups::remove(&store, group, confirm.as_mut())? {
        RemoveOutcome::GroupRemoved(name) => {
            println!("Group '{}' has been removed.", name);
        }
        RemoveOutcome::ArchiveDeleted => {
            println!(
                "All groups have been removed and {} deleted.",
                store.path().display()
            );
        }
        RemoveOutcome::Cancelled => {
            println!("Removal cancelled.");
        }
    }

    Ok(())
}
