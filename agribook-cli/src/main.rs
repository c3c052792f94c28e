use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

mod config;
mod money;
mod reports;
mod state;

use agribook_backup::{apply_backup, full_backup, full_backup_file_name, parse_backup,
    season_backup, season_backup_file_name};
use agribook_core::{
    CategoryGroup, PaymentSource, Partner, Season, SeasonStatus, Transaction, TransactionFilter,
    TransactionKind, TransactionType, Worker, derive_financials, filter_transactions,
    settle_season,
};

use crate::config::{LANGUAGES, load_config, save_config};
use crate::money::format_inr;
use crate::state::{ensure_agribook_home, load_store, save_store};

#[derive(Parser, Debug)]
#[command(name = "agribook", version, about = "Farm partnership bookkeeping")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage crop seasons
    Season {
        #[command(subcommand)]
        command: SeasonCommand,
    },

    /// Manage farm workers
    Worker {
        #[command(subcommand)]
        command: WorkerCommand,
    },

    /// Manage capital partners
    Partner {
        #[command(subcommand)]
        command: PartnerCommand,
    },

    /// Record and inspect transactions
    Txn {
        #[command(subcommand)]
        command: TxnCommand,
    },

    /// Derived reports over the whole book
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Backup export and merge import
    Data {
        #[command(subcommand)]
        command: DataCommand,
    },

    /// Category label lists
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Show or set the display language (EN or GU)
    Lang { value: Option<String> },
}

#[derive(Subcommand, Debug)]
enum SeasonCommand {
    /// Start a new season (defaults to today)
    Add {
        name: String,
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Close a season; its end date becomes today
    Close { id: String },
    /// Delete a season and every transaction in it
    Delete { id: String },
    List,
    /// Worker-share settlement for one season
    Settle {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum WorkerCommand {
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        joined: Option<NaiveDate>,
    },
    /// Only possible while no transaction references the worker
    Delete { id: String },
    List,
}

#[derive(Subcommand, Debug)]
enum PartnerCommand {
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        joined: Option<NaiveDate>,
    },
    List,
    /// Everything one partner has put in or taken out
    Statement {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TxnCommand {
    Add {
        #[arg(long)]
        amount: f64,
        #[arg(long = "type", value_enum)]
        kind: TypeArg,
        #[arg(long)]
        season: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value = "cash")]
        source: SourceArg,
        /// Partner who paid from their own pocket (source = partner)
        #[arg(long)]
        payer: Option<String>,
        /// Worker receiving an advance (type = worker-advance)
        #[arg(long)]
        worker: Option<String>,
        /// Partner contributing or withdrawing (type = partner-*)
        #[arg(long)]
        partner: Option<String>,
        /// Leave this record out of the worker-share bases
        #[arg(long)]
        exclude_from_worker_share: bool,
    },
    /// Change date, amount, category or description of a record
    Edit {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
    /// Flip a record's worker-share flag
    Share {
        id: String,
        #[arg(value_enum)]
        mode: ShareArg,
    },
    /// List transactions, newest first
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long = "type", value_enum)]
        kind: Option<TypeArg>,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        worker: Option<String>,
        #[arg(long)]
        partner: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Also write the list to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Cash, bank, advances and partner balances
    Financials {
        #[arg(long)]
        json: bool,
    },
    /// Profit split after the worker share
    Distribution {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Write a full backup file
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a single-season backup file
    ExportSeason {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge a backup file into this book
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    Add {
        #[arg(value_enum)]
        group: GroupArg,
        label: String,
    },
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TypeArg {
    Income,
    Expense,
    WorkerAdvance,
    PartnerContribution,
    PartnerWithdrawal,
}

impl TypeArg {
    fn core(self) -> TransactionType {
        match self {
            TypeArg::Income => TransactionType::Income,
            TypeArg::Expense => TransactionType::Expense,
            TypeArg::WorkerAdvance => TransactionType::WorkerAdvance,
            TypeArg::PartnerContribution => TransactionType::PartnerContribution,
            TypeArg::PartnerWithdrawal => TransactionType::PartnerWithdrawal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Cash,
    Bank,
    Partner,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupArg {
    Income,
    Expense,
    WorkerAdvance,
    Partner,
}

impl GroupArg {
    fn core(self) -> CategoryGroup {
        match self {
            GroupArg::Income => CategoryGroup::Income,
            GroupArg::Expense => CategoryGroup::Expense,
            GroupArg::WorkerAdvance => CategoryGroup::WorkerAdvance,
            GroupArg::Partner => CategoryGroup::Partner,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShareArg {
    Include,
    Exclude,
}

fn new_id(prefix: &str) -> String {
    format!("{}{:x}", prefix, Utc::now().timestamp_micros())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = ensure_agribook_home()?;
    let mut store = load_store(&dir)?;

    match cli.command {
        Command::Season { command } => match command {
            SeasonCommand::Add { name, start } => {
                let season = Season::open(new_id("s"), name, start.unwrap_or_else(today));
                println!("Season '{}' created ({})", season.name, season.id);
                store.add_season(season);
                save_store(&dir, &store)?;
            }
            SeasonCommand::Close { id } => {
                store.close_season(&id, today())?;
                save_store(&dir, &store)?;
                println!("Season {id} closed");
            }
            SeasonCommand::Delete { id } => {
                let before = store.transactions.len();
                store.delete_season(&id)?;
                save_store(&dir, &store)?;
                println!(
                    "Season {id} deleted along with {} transactions",
                    before - store.transactions.len()
                );
            }
            SeasonCommand::List => {
                for s in &store.seasons {
                    let status = match s.status {
                        SeasonStatus::Open => "OPEN",
                        SeasonStatus::Closed => "CLOSED",
                    };
                    let end = s
                        .end_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "Present".to_string());
                    println!("{}  {:<24} {} - {}  {}", s.id, s.name, s.start_date, end, status);
                }
            }
            SeasonCommand::Settle { id, json } => {
                let season = store
                    .season(&id)
                    .with_context(|| format!("unknown season: {id}"))?;
                let settlement = settle_season(&store.transactions, &id);
                if json {
                    println!("{}", serde_json::to_string_pretty(&settlement)?);
                } else {
                    reports::print_settlement(season, &settlement);
                }
            }
        },

        Command::Worker { command } => match command {
            WorkerCommand::Add { name, phone, joined } => {
                let mut worker = Worker::new(new_id("w"), name, joined.unwrap_or_else(today));
                if let Some(phone) = phone {
                    worker = worker.with_phone(phone);
                }
                println!("Worker '{}' added ({})", worker.name, worker.id);
                store.add_worker(worker);
                save_store(&dir, &store)?;
            }
            WorkerCommand::Delete { id } => {
                store.delete_worker(&id)?;
                save_store(&dir, &store)?;
                println!("Worker {id} deleted");
            }
            WorkerCommand::List => {
                for w in &store.workers {
                    println!(
                        "{}  {:<20} {:<14} joined {}  debt {}",
                        w.id,
                        w.name,
                        if w.phone.is_empty() { "-" } else { &w.phone },
                        w.joined_date,
                        format_inr(store.worker_advances_total(&w.id))
                    );
                }
            }
        },

        Command::Partner { command } => match command {
            PartnerCommand::Add { name, phone, joined } => {
                let mut partner = Partner::new(new_id("p"), name, joined.unwrap_or_else(today));
                if let Some(phone) = phone {
                    partner = partner.with_phone(phone);
                }
                println!("Partner '{}' added ({})", partner.name, partner.id);
                store.add_partner(partner);
                save_store(&dir, &store)?;
            }
            PartnerCommand::List => {
                let financials = derive_financials(&store.transactions, &store.partners);
                for p in &store.partners {
                    let balance = financials
                        .partner_balances
                        .get(&p.id)
                        .copied()
                        .unwrap_or(0.0);
                    println!("{}  {:<20} balance {}", p.id, p.name, format_inr(balance));
                }
            }
            PartnerCommand::Statement { id, json } => {
                let partner = store
                    .partner(&id)
                    .with_context(|| format!("unknown partner: {id}"))?;
                let statement = store.partner_statement(&id);
                if json {
                    println!("{}", serde_json::to_string_pretty(&statement)?);
                } else {
                    reports::print_partner_statement(&partner.name, &statement);
                }
            }
        },

        Command::Txn { command } => match command {
            TxnCommand::Add {
                amount,
                kind,
                season,
                category,
                date,
                description,
                source,
                payer,
                worker,
                partner,
                exclude_from_worker_share,
            } => {
                let include = !exclude_from_worker_share;
                let txn_kind = match kind {
                    TypeArg::Income => TransactionKind::Income {
                        include_in_worker_share: include,
                    },
                    TypeArg::Expense => TransactionKind::Expense {
                        include_in_worker_share: include,
                    },
                    TypeArg::WorkerAdvance => {
                        let worker_id =
                            worker.context("--worker is required for a worker advance")?;
                        if store.worker(&worker_id).is_none() {
                            bail!("unknown worker: {worker_id}");
                        }
                        TransactionKind::WorkerAdvance { worker_id }
                    }
                    TypeArg::PartnerContribution | TypeArg::PartnerWithdrawal => {
                        let partner_id = partner
                            .context("--partner is required for a contribution or withdrawal")?;
                        if store.partner(&partner_id).is_none() {
                            bail!("unknown partner: {partner_id}");
                        }
                        if matches!(kind, TypeArg::PartnerContribution) {
                            TransactionKind::PartnerContribution { partner_id }
                        } else {
                            TransactionKind::PartnerWithdrawal { partner_id }
                        }
                    }
                };

                let payment_source = match source {
                    SourceArg::Cash => PaymentSource::FarmCash,
                    SourceArg::Bank => PaymentSource::FarmBank,
                    SourceArg::Partner => {
                        let payer_partner_id =
                            payer.context("--payer is required when a partner pays from pocket")?;
                        if store.partner(&payer_partner_id).is_none() {
                            bail!("unknown partner: {payer_partner_id}");
                        }
                        PaymentSource::Partner { payer_partner_id }
                    }
                };

                // First use of a new label registers it in its group.
                store.categories.add(kind.core().category_group(), &category);

                let txn = Transaction::new(
                    new_id("t"),
                    date.unwrap_or_else(today),
                    amount,
                    txn_kind,
                    payment_source,
                    category.trim(),
                    season,
                )
                .with_description(description);
                let id = txn.id.clone();
                store.add_transaction(txn)?;
                save_store(&dir, &store)?;
                println!("Transaction recorded ({id})");
            }
            TxnCommand::Edit {
                id,
                date,
                amount,
                category,
                description,
            } => {
                let mut txn = store
                    .transactions
                    .iter()
                    .find(|t| t.id == id)
                    .cloned()
                    .with_context(|| format!("unknown transaction: {id}"))?;
                if let Some(date) = date {
                    txn.date = date;
                }
                if let Some(amount) = amount {
                    txn.amount = amount;
                }
                if let Some(category) = category {
                    store
                        .categories
                        .add(txn.transaction_type().category_group(), &category);
                    txn.category = category.trim().to_string();
                }
                if let Some(description) = description {
                    txn.description = description;
                }
                store.update_transaction(txn)?;
                save_store(&dir, &store)?;
                println!("Transaction {id} updated");
            }
            TxnCommand::Delete { id } => {
                store.delete_transaction(&id)?;
                save_store(&dir, &store)?;
                println!("Transaction {id} deleted");
            }
            TxnCommand::Share { id, mode } => {
                store.set_worker_share(&id, matches!(mode, ShareArg::Include))?;
                save_store(&dir, &store)?;
                println!("Transaction {id} updated");
            }
            TxnCommand::List {
                search,
                kind,
                season,
                worker,
                partner,
                category,
                from,
                to,
                csv,
            } => {
                let filter = TransactionFilter {
                    search,
                    transaction_type: kind.map(TypeArg::core),
                    season_id: season,
                    worker_id: worker,
                    partner_id: partner,
                    category,
                    start_date: from,
                    end_date: to,
                };
                let transactions = filter_transactions(&store.transactions, &filter);
                reports::print_transactions(&store, &transactions);
                if let Some(path) = csv {
                    reports::write_transactions_csv(&path, &store, &transactions)?;
                    println!("Wrote {}", path.display());
                }
            }
        },

        Command::Report { command } => match command {
            ReportCommand::Financials { json } => {
                let financials = derive_financials(&store.transactions, &store.partners);
                if json {
                    println!("{}", serde_json::to_string_pretty(&financials)?);
                } else {
                    reports::print_financials(&store, &financials);
                }
            }
            ReportCommand::Distribution { json } => {
                let financials = derive_financials(&store.transactions, &store.partners);
                if json {
                    println!("{}", serde_json::to_string_pretty(&financials.share_details)?);
                } else {
                    reports::print_distribution(&financials);
                }
            }
        },

        Command::Data { command } => match command {
            DataCommand::Export { out } => {
                let doc = full_backup(&store, Utc::now())?;
                let path = out.unwrap_or_else(|| PathBuf::from(full_backup_file_name(today())));
                fs::write(&path, serde_json::to_string_pretty(&doc)?)
                    .with_context(|| format!("write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
            DataCommand::ExportSeason { id, out } => {
                let season = store
                    .season(&id)
                    .with_context(|| format!("unknown season: {id}"))?;
                let doc = season_backup(&store, &id, Utc::now())?;
                let path =
                    out.unwrap_or_else(|| PathBuf::from(season_backup_file_name(&season.name)));
                fs::write(&path, serde_json::to_string_pretty(&doc)?)
                    .with_context(|| format!("write {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
            DataCommand::Import { file } => {
                let json = fs::read_to_string(&file)
                    .with_context(|| format!("read {}", file.display()))?;
                let doc = parse_backup(&json)?;
                store = apply_backup(&store, &doc)?;
                save_store(&dir, &store)?;
                println!(
                    "Merged backup: {} seasons, {} partners, {} workers, {} transactions",
                    store.seasons.len(),
                    store.partners.len(),
                    store.workers.len(),
                    store.transactions.len()
                );
            }
        },

        Command::Category { command } => match command {
            CategoryCommand::Add { group, label } => {
                store.add_category(group.core(), &label)?;
                save_store(&dir, &store)?;
                println!("Category added");
            }
            CategoryCommand::List => {
                for group in CategoryGroup::ALL {
                    println!("{}:", group.key());
                    for label in store.categories.group(group) {
                        println!("  {label}");
                    }
                }
            }
        },

        Command::Lang { value } => match value {
            Some(value) => {
                let language = value.to_uppercase();
                if !LANGUAGES.contains(&language.as_str()) {
                    bail!("unsupported language: {value} (expected EN or GU)");
                }
                let mut cfg = load_config()?;
                cfg.language = language;
                save_config(&cfg)?;
                println!("Language set to {}", cfg.language);
            }
            None => println!("{}", load_config()?.language),
        },
    }

    Ok(())
}
