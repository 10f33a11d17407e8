//! Prepares a gradebook database.
//!
//! Opening the database applies any pending migrations. If the configuration names a roster
//! (`roster.path`), its students are imported as well.

use anyhow::Result;
use gradebook::roster;

pub fn main() -> Result<()> {
    let (settings, mut manager) = gradebook::create_default_manager()?;
    println!("Database ready at {}", settings.database.url);

    if let Some(path) = settings.roster.path {
        let students = roster::read_roster(&path)?;
        let added = manager.insert_students(&students)?;
        println!("Imported {} students from {}", added.len(), path.display());
    }

    Ok(())
}
