//! Status command handler

use anyhow::Result;

use hostel_core::{Config, FileStorage, Store, DOCUMENT_KEY};

use crate::output::{Output, OutputFormat};

/// Show storage location, session and record counts
pub fn show(store: &Store, config: &Config, output: &Output) -> Result<()> {
    let stats = store.stats()?;
    let session = store.current_user()?;
    let storage = FileStorage::from_config(config);
    let document_path = storage.path_for(DOCUMENT_KEY);
    let document_size = storage.size_of(DOCUMENT_KEY);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "document": document_path,
                    "document_bytes": document_size,
                    "session": session,
                    "counts": stats,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Hostel Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Document: {}", document_path.display());
            println!("  Size:     {} bytes", document_size);
            println!();
            println!("Session:");
            match session {
                Some(ref s) => println!("  {} {}", s.role, s.username),
                None => println!("  (not logged in)"),
            }
            println!();
            println!("Contents:");
            println!("  Hostels:          {}", stats.hostels);
            println!("  Owners:           {}", stats.owners);
            println!("  Students:         {}", stats.students);
            println!("  Rooms:            {}", stats.rooms);
            println!("  Payments:         {}", stats.payments);
            println!("  Room requests:    {}", stats.room_change_requests);
            println!("  Student accounts: {}", stats.sessions);
        }
    }

    Ok(())
}

