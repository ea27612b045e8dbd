use chrono::Utc;
use dotenvy::dotenv;
use metaforma_admin::{
    config::settings,
    core::{
        context::AppContext, export, format, installments::InstallmentFilter, reconciliation,
    },
    errors::{Error, Result},
};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Uso: metaforma-admin [comando]

Comandos:
  painel                        Resumo financeiro por turma (padrão)
  parcelas [busca] [turma]      Lista de parcelas, filtrada por nome/email e turma
  exportar <pasta>              Grava documento.json, alunos.csv, parcelas.csv e despesas.csv
  conciliar <extrato.csv> [--aplicar]
                                Concilia um extrato bancário com as parcelas em aberto";

/// What the binary was asked to do.
enum Command {
    Dashboard,
    Payments { filter: InstallmentFilter },
    Export { dir: PathBuf },
    Reconcile { statement: PathBuf, apply: bool },
}

fn parse_args(args: &[String]) -> Option<Command> {
    let command = match args {
        [] => Command::Dashboard,
        [cmd] if cmd == "painel" => Command::Dashboard,
        [cmd, rest @ ..] if cmd == "parcelas" && rest.len() <= 2 => {
            let filter = InstallmentFilter::search(rest.first().cloned().unwrap_or_default());
            match rest.get(1) {
                Some(fac) => Command::Payments {
                    filter: filter.in_fac(fac.clone()),
                },
                None => Command::Payments { filter },
            }
        }
        [cmd, dir] if cmd == "exportar" => Command::Export { dir: dir.into() },
        [cmd, statement] if cmd == "conciliar" => Command::Reconcile {
            statement: statement.into(),
            apply: false,
        },
        [cmd, statement, flag] if cmd == "conciliar" && flag == "--aplicar" => {
            Command::Reconcile {
                statement: statement.into(),
                apply: true,
            }
        }
        _ => return None,
    };
    Some(command)
}

fn print_dashboard(context: &AppContext) {
    let now = Utc::now();
    let summaries = context.financial_summaries(now);
    if summaries.is_empty() {
        println!("Nenhuma turma (FAC) cadastrada ainda.");
        return;
    }

    for summary in &summaries {
        println!(
            "{}\n",
            format::format_fac_card(summary, context.fac_by_code(&summary.fac_code))
        );
    }
    println!("{}", format::format_overview(&context.dashboard(now)));
}

fn print_payments(context: &AppContext, filter: &InstallmentFilter) {
    let rows = context.installments(filter);
    if rows.is_empty() {
        println!("Nenhuma parcela encontrada.");
        return;
    }
    for row in &rows {
        println!("{}", format::format_installment_row(row));
    }
}

fn write_exports(context: &AppContext, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let rows = context.installments(&InstallmentFilter::default());

    let files = [
        ("documento.json", export::export_document(context.data())?),
        ("alunos.csv", export::export_students_csv(context.students())?),
        ("parcelas.csv", export::export_installments_csv(&rows)?),
        ("despesas.csv", export::export_expenses_csv(context.expenses())?),
    ];
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

async fn run_reconciliation(
    context: &mut AppContext,
    statement: &Path,
    apply: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(statement)?;
    let transactions = reconciliation::parse_bank_statement(&raw)?;
    let result = context.reconcile(&transactions, Utc::now());
    println!("{}", format::format_reconciliation(&result));

    if apply {
        let applied = context.apply_reconciliation(&result).await?;
        println!("{applied} parcela(s) marcadas como pagas.");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Parse the command line
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{USAGE}");
        return Err(Error::Config {
            message: format!("Unrecognized arguments: {}", args.join(" ")),
        });
    };

    // 3. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 4. Load settings (defaults when config.toml is absent)
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 5. Open the store and load the application document
    let mut context = AppContext::open(&settings)
        .await
        .inspect(|_| info!("Application data loaded."))
        .inspect_err(|e| error!("Failed to open store: {}", e))?;

    // 6. Run the command
    match command {
        Command::Dashboard => print_dashboard(&context),
        Command::Payments { filter } => print_payments(&context, &filter),
        Command::Export { dir } => write_exports(&context, &dir)?,
        Command::Reconcile { statement, apply } => {
            run_reconciliation(&mut context, &statement, apply).await?;
        }
    }

    Ok(())
}
