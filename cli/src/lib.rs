pub mod cases;

use clap::Parser;
use iurisdata_cases::RecordStore;
use iurisdata_cases::factory;
use iurisdata_cases::factory::Backend;
use std::path::PathBuf;

pub use cases::CaseCommand;

/// Track hearings and legal cases from the terminal.
#[derive(Debug, Parser)]
#[command(name = "iurisdata", author, version)]
pub struct Cli {
    /// Directory holding the case collection (default `$IURISDATA_HOME` or `~/.iurisdata`)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: `json` or `sqlite` (default `$IURISDATA_BACKEND` or json)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub cmd: CaseCommand,
}

impl Cli {
    fn open_store(&self) -> anyhow::Result<RecordStore> {
        let data_dir = factory::resolve_data_dir(self.data_dir.as_deref())?;
        let backend = self
            .backend
            .as_deref()
            .map(str::parse::<Backend>)
            .transpose()?;
        let slot = factory::open_slot(&data_dir, backend)?;
        Ok(RecordStore::open(slot))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if let CaseCommand::Migrate { json, sqlite } = &cli.cmd {
        let n = factory::migrate_json_to_sqlite(json, sqlite)?;
        println!("Migrated {n} cases");
        return Ok(());
    }
    let mut store = cli.open_store()?;
    cases::run(cli.cmd, &mut store).await
}
