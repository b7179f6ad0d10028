use chrono::Local;
use chrono::Utc;
use clap::Args;
use clap::Subcommand;
use clap::ValueEnum;
use iurisdata_cases::CaseFields;
use iurisdata_cases::Medium;
use iurisdata_cases::RecordStore;
use iurisdata_cases::backup;
use iurisdata_cases::confirm::DeleteConfirmation;
use iurisdata_cases::demo::sample_case;
use iurisdata_cases::export;
use iurisdata_cases::form::CaseForm;
use iurisdata_cases::form::Submitted;
use iurisdata_cases::query;
use iurisdata_summary::GeminiSummarizer;
use std::io::Write as _;
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;

/// Case subcommands.
#[derive(Debug, Subcommand)]
pub enum CaseCommand {
    /// Register a new case.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
        /// Append an AI summary to the observations before saving.
        #[arg(long)]
        summarize: bool,
    },
    /// Overwrite fields of an existing case.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List cases, most recent hearing first.
    List {
        /// Case-insensitive filter over NUREJ, case number, crime, lawyer and parties.
        #[arg(long)]
        search: Option<String>,
        /// Print the filtered cases as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Print one case as JSON.
    Show { id: String },
    /// Delete a case after confirmation.
    Rm {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Append an AI summary to a stored case.
    Summarize { id: String },
    /// Add randomly generated sample cases.
    Demo {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Show case counters.
    Stats {
        /// Print the counters as a JSON object.
        #[arg(long)]
        json: bool,
    },
    /// Write a report of every case.
    Export {
        #[arg(long, value_enum)]
        format: ReportFormat,
        /// Output directory (default current directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a JSON backup of every case.
    Backup {
        /// Output directory (default current directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the whole collection with the contents of a backup file.
    Restore { file: PathBuf },
    /// Copy a JSON case file into a SQLite database.
    Migrate {
        /// Path to the source JSON file
        #[arg(long)]
        json: PathBuf,
        /// Path to the destination SQLite database file
        #[arg(long)]
        sqlite: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Xlsx,
    Pdf,
    Docx,
}

/// Form fields. Flags left out keep the current value.
#[derive(Debug, Default, Args)]
pub struct FieldArgs {
    /// Hearing date and time, `YYYY-MM-DDTHH:MM`.
    #[arg(long = "date-time")]
    pub date_time: Option<String>,
    #[arg(long)]
    pub nurej: Option<String>,
    #[arg(long = "case-number")]
    pub case_number: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub characteristics: Option<String>,
    #[arg(long)]
    pub parties: Option<String>,
    #[arg(long)]
    pub crime: Option<String>,
    #[arg(long = "hearing-type")]
    pub hearing_type: Option<String>,
    #[arg(long = "court-room")]
    pub court_room: Option<String>,
    #[arg(long)]
    pub lawyer: Option<String>,
    /// `Presencial` or `Virtual`.
    #[arg(long)]
    pub medium: Option<Medium>,
    #[arg(long)]
    pub observations: Option<String>,
}

impl FieldArgs {
    fn apply(self, draft: &mut CaseFields) {
        let texts = [
            (self.date_time, &mut draft.date_time),
            (self.nurej, &mut draft.nurej),
            (self.case_number, &mut draft.case_number),
            (self.city, &mut draft.city),
            (self.characteristics, &mut draft.characteristics),
            (self.parties, &mut draft.parties),
            (self.crime, &mut draft.crime),
            (self.hearing_type, &mut draft.hearing_type),
            (self.court_room, &mut draft.court_room),
            (self.lawyer, &mut draft.lawyer),
            (self.observations, &mut draft.observations),
        ];
        for (value, slot) in texts {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(medium) = self.medium {
            draft.medium = medium;
        }
    }
}

/// Execute a case command against `store`.
pub async fn run(cmd: CaseCommand, store: &mut RecordStore) -> anyhow::Result<()> {
    match cmd {
        CaseCommand::Add { fields, summarize } => {
            let mut form = CaseForm::new();
            fields.apply(&mut form.draft);
            if summarize {
                let ai = GeminiSummarizer::from_env()?;
                form.request_summary(&ai).await?;
            }
            match form.submit(store)? {
                Submitted::Created(case) => println!("Created case {}", case.id),
                Submitted::Updated { id, .. } => println!("Updated case {id}"),
            }
        }
        CaseCommand::Edit { id, fields } => {
            let Some(case) = store.get(&id) else {
                anyhow::bail!("case not found: {id}");
            };
            let mut form = CaseForm::edit(case);
            fields.apply(&mut form.draft);
            save_edit(form, store)?;
        }
        CaseCommand::List { search, json } => {
            let cases = query::filter_cases(store.list(), search.as_deref().unwrap_or(""));
            if json {
                println!("{}", serde_json::to_string_pretty(&cases)?);
            } else if cases.is_empty() {
                println!("No cases found");
            } else {
                for case in &cases {
                    let f = &case.fields;
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                        case.id,
                        query::display_datetime(&f.date_time),
                        f.nurej,
                        f.case_number,
                        f.parties,
                        f.crime,
                        f.medium
                    );
                }
            }
        }
        CaseCommand::Show { id } => {
            let Some(case) = store.get(&id) else {
                anyhow::bail!("case not found: {id}");
            };
            println!("{}", serde_json::to_string_pretty(case)?);
        }
        CaseCommand::Rm { id, yes } => {
            if store.get(&id).is_none() {
                anyhow::bail!("case not found: {id}");
            }
            let mut confirm = DeleteConfirmation::new();
            confirm.request(id.clone());
            if !yes && !ask(&format!("Delete case {id}? [y/N] ")).await? {
                confirm.cancel();
                println!("Cancelled");
                return Ok(());
            }
            confirm.confirm(store)?;
            println!("Deleted case {id}");
        }
        CaseCommand::Summarize { id } => {
            let Some(case) = store.get(&id) else {
                anyhow::bail!("case not found: {id}");
            };
            let mut form = CaseForm::edit(case);
            let ai = GeminiSummarizer::from_env()?;
            form.request_summary(&ai).await?;
            println!("{}", form.draft.observations);
            save_edit(form, store)?;
        }
        CaseCommand::Demo { count } => {
            let mut rng = rand::rng();
            for _ in 0..count {
                store.create(sample_case(&mut rng, &Local::now()))?;
            }
            println!("Added {count} demo cases");
        }
        CaseCommand::Stats { json } => {
            let stats = store.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }
            println!(
                "Total: {}\nPresencial: {}\nVirtual: {}",
                stats.total, stats.presencial, stats.virtual_count
            );
        }
        CaseCommand::Export { format, out } => {
            let out_dir = out_dir(out)?;
            let now = Local::now();
            let path = match format {
                ReportFormat::Xlsx => export::xlsx::export_xlsx(store.list(), &out_dir, &now)?,
                ReportFormat::Pdf => export::pdf::export_pdf(store.list(), &out_dir, &now)?,
                ReportFormat::Docx => export::docx::export_docx(store.list(), &out_dir, &now).await?,
            };
            println!("{}", path.display());
        }
        CaseCommand::Backup { out } => {
            let out_dir = out_dir(out)?;
            let path = backup::write_backup(store.list(), &out_dir, Utc::now().date_naive())?;
            println!("{}", path.display());
        }
        CaseCommand::Restore { file } => {
            let n = backup::restore_from_path(store, &file)?;
            println!("Restored {n} cases");
        }
        CaseCommand::Migrate { .. } => {
            anyhow::bail!("migrate does not operate on an open store");
        }
    }
    Ok(())
}

fn save_edit(form: CaseForm, store: &mut RecordStore) -> anyhow::Result<()> {
    match form.submit(store)? {
        Submitted::Updated { id, found: true } => println!("Updated case {id}"),
        Submitted::Updated { id, found: false } => anyhow::bail!("case not found: {id}"),
        Submitted::Created(case) => println!("Created case {}", case.id),
    }
    Ok(())
}

fn out_dir(out: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match out {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

async fn ask(prompt: &str) -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut line = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    let answer = line.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "s" | "si" | "sí"))
}
