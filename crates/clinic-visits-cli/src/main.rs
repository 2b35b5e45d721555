use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clinic_visits_core::models::{FilterCriteria, RemoteConfig, VisitType};
use clinic_visits_core::paginate::RowDescriptor;
use clinic_visits_core::reference::ReferenceData;
use clinic_visits_core::{Dashboard, Database, VisitForm};
use clinic_visits_store::StoreClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "visits")]
#[command(about = "Clinic visit log: submit records and print reports")]
struct Cli {
    /// Store endpoint URL (overrides the saved remote config)
    #[arg(long, global = true, env = "CLINIC_VISITS_ENDPOINT")]
    endpoint: Option<String>,

    /// Settings database
    #[arg(
        long,
        global = true,
        env = "CLINIC_VISITS_SETTINGS",
        default_value = "clinic-visits.db"
    )]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Check that the store endpoint is reachable
    Check,
    /// Validate a visit form (JSON file) and save it to the store
    Submit {
        /// Path to the form JSON
        form: PathBuf,
    },
    /// Delete one row from a sheet
    Delete {
        /// Visit type or sheet name, e.g. "Berobat"
        #[arg(long, value_parser = parse_visit_type)]
        sheet: VisitType,
        /// Row number in the sheet
        #[arg(long)]
        row: u32,
    },
    /// Fetch all sheets and print a filtered report
    Report(ReportArgs),
    /// Suggest medicine or disease names from a reference catalog
    Suggest {
        /// Reference catalog JSON
        #[arg(long)]
        catalog: PathBuf,
        #[arg(value_enum)]
        kind: SuggestKind,
        query: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// List a company's departments from a reference catalog
    Departments {
        #[arg(long)]
        catalog: PathBuf,
        company: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved settings
    Show,
    /// Save the store endpoint
    SetUrl {
        url: String,
        /// Save the URL but keep the remote store disabled
        #[arg(long)]
        disabled: bool,
    },
    /// Remember the selected company
    Company { name: String },
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Company, or "all" (defaults to the saved company)
    #[arg(long)]
    company: Option<String>,
    #[arg(long, default_value = "")]
    department: String,
    #[arg(long, default_value = "")]
    year: String,
    /// Month number, 1-12
    #[arg(long, default_value = "")]
    month: String,
    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,
    /// Page of the visit table to print
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value = "Laporan Kunjungan Klinik")]
    title: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Table,
    Html,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum SuggestKind {
    Medicine,
    Disease,
}

fn parse_visit_type(value: &str) -> Result<VisitType, String> {
    VisitType::parse(value).ok_or_else(|| format!("unknown visit type: {}", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Config { action } => run_config(&cli, action),
        Commands::Check => {
            let client = store_client(&cli)?;
            let reply = client.check_connection().await;
            println!("{}", reply.message);
            if !reply.success {
                bail!("store unreachable at {}", client.endpoint());
            }
            Ok(())
        }
        Commands::Submit { form } => {
            let text = std::fs::read_to_string(form)
                .with_context(|| format!("reading form {}", form.display()))?;
            let form: VisitForm = serde_json::from_str(&text).context("parsing form JSON")?;
            let reply = store_client(&cli)?
                .submit(&form)
                .await
                .context("validating visit form")?;
            println!("{}", reply.message);
            if !reply.success {
                bail!("save failed");
            }
            Ok(())
        }
        Commands::Delete { sheet, row } => {
            let reply = store_client(&cli)?.delete(*sheet, *row).await;
            println!("{}", reply.message);
            if !reply.success {
                bail!("delete failed");
            }
            Ok(())
        }
        Commands::Report(args) => run_report(&cli, args).await,
        Commands::Suggest {
            catalog,
            kind,
            query,
            limit,
        } => {
            let data = load_catalog(catalog)?;
            let suggestions = match kind {
                SuggestKind::Medicine => data.suggest_medicines(query, *limit),
                SuggestKind::Disease => data.suggest_diseases(query, *limit),
            };
            if suggestions.is_empty() {
                println!("No matches.");
            }
            for s in suggestions {
                match s.category {
                    Some(category) => println!("{:.2}  {} ({})", s.score, s.name, category),
                    None => println!("{:.2}  {}", s.score, s.name),
                }
            }
            Ok(())
        }
        Commands::Departments { catalog, company } => {
            let data = load_catalog(catalog)?;
            for department in data.departments(company)? {
                println!("{}", department);
            }
            Ok(())
        }
    }
}

fn open_settings(cli: &Cli) -> Result<Database> {
    Database::open(&cli.settings)
        .with_context(|| format!("opening settings {}", cli.settings.display()))
}

fn store_client(cli: &Cli) -> Result<StoreClient> {
    let endpoint = match &cli.endpoint {
        Some(url) => url.clone(),
        None => {
            let config = open_settings(cli)?.remote_config()?;
            match config.endpoint() {
                Some(url) => url.to_string(),
                None => bail!("no store endpoint: pass --endpoint or run `visits config set-url`"),
            }
        }
    };
    Ok(StoreClient::connect(&endpoint)?)
}

fn load_catalog(path: &Path) -> Result<ReferenceData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    ReferenceData::from_json(&text).context("parsing catalog")
}

fn run_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let db = open_settings(cli)?;
    match action {
        ConfigAction::Show => {
            let config = db.remote_config()?;
            println!("endpoint:         {}", display_or_dash(&config.url));
            println!("enabled:          {}", config.enabled);
            println!("sync enabled:     {}", config.sync_enabled);
            let company = db.selected_company()?.unwrap_or_default();
            println!("selected company: {}", display_or_dash(&company));
        }
        ConfigAction::SetUrl { url, disabled } => {
            let mut config = RemoteConfig::new(url.trim());
            config.enabled = !disabled;
            db.set_remote_config(&config)?;
            println!("Saved endpoint {}", config.url);
        }
        ConfigAction::Company { name } => {
            db.set_selected_company(name)?;
            println!("Selected company {}", name);
        }
    }
    Ok(())
}

async fn run_report(cli: &Cli, args: &ReportArgs) -> Result<()> {
    let company = match &args.company {
        Some(company) => company.clone(),
        None => open_settings(cli)?.selected_company()?.unwrap_or_default(),
    };
    let criteria =
        FilterCriteria::from_selectors(&company, &args.department, &args.year, &args.month, &args.name);
    tracing::debug!(?criteria, "report criteria");

    let records = store_client(cli)?
        .fetch_all()
        .await
        .context("fetching visit records")?;

    let mut dashboard = Dashboard::default();
    dashboard.set_records(records);
    dashboard.apply(criteria);

    match args.format {
        ReportFormat::Html => println!("{}", dashboard.report(&args.title).to_html()),
        ReportFormat::Json => println!("{}", dashboard.report(&args.title).to_json()?),
        ReportFormat::Csv => print!("{}", dashboard.export_csv()),
        ReportFormat::Table => {
            dashboard.go_to_page(args.page);
            print_table(&dashboard, &args.title);
        }
    }
    Ok(())
}

fn print_table(dashboard: &Dashboard, title: &str) {
    let report = dashboard.report(title);
    println!("{}", report.title);
    println!(
        "Total kunjungan: {}   Total hari istirahat: {}",
        report.total_visits, report.total_rest_days
    );

    for section in report.sections() {
        println!();
        println!("{}", section.heading);
        for row in &section.rows {
            println!("  {:<30} {:>5} {:>6}%", row.label, row.count, row.percentage);
        }
    }

    println!();
    println!(
        "Halaman {} dari {}",
        dashboard.current_page(),
        dashboard.page_count()
    );
    for row in dashboard.page_rows() {
        match row {
            RowDescriptor::Visit {
                number,
                date,
                person_name,
                company,
                department,
                visit_type,
                summary,
                ..
            } => println!(
                "{:>4}  {:<12} {:<20} {:<16} {:<14} {:<17} {}",
                number, date, person_name, company, department, visit_type, summary
            ),
            RowDescriptor::Placeholder { message } => println!("  {}", message),
        }
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
