//! Bank desk CLI: schema bootstrap, exports and account tooling.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use bankdesk_core::{
    apply_schema, init_logging, open_db, AccountService, BackupWriter, BankConfig,
    BankRepository, EntityKind, ExportService, FailurePolicy, IssueCardRequest, RepoError, Role,
    Schema, SqliteBankRepository,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

/// Bank desk - back office tooling for the banking database
#[derive(Parser)]
#[command(name = "bankdesk", version, about, long_about = None)]
struct Cli {
    /// Settings file (JSON); defaults apply when it does not exist
    #[arg(long, global = true, default_value = "bankdesk.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tables and seed reference data
    Init {
        /// Login of a manager account to create
        #[arg(long, requires = "admin_password")]
        admin_login: Option<String>,
        /// Password for the manager account
        #[arg(long, env = "BANKDESK_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: Option<String>,
    },

    /// Export every table to the backup directory
    Export {
        /// Export the remaining tables after a failure
        #[arg(long)]
        keep_going: bool,
    },

    /// Print the PAN the next issued card would get
    NextPan,

    /// Check a login and password
    SignIn {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        login: String,
        #[arg(long, env = "BANKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Register a manager or client account
    Register {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        login: String,
        #[arg(long, env = "BANKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Issue a card to an existing client
    IssueCard {
        #[arg(long)]
        client_id: i64,
        #[arg(long)]
        pin: i64,
        #[arg(long)]
        cvv: i64,
        /// Expiry as printed on the card, e.g. 1226
        #[arg(long)]
        validity: i64,
        #[arg(long, default_value_t = 0)]
        balance: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Manager,
    Client,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Manager => Role::Manager,
            RoleArg::Client => Role::Client,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = BankConfig::load(&cli.config)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let repo = SqliteBankRepository::new(&conn);

    match cli.command {
        Commands::Init {
            admin_login,
            admin_password,
        } => {
            let schema = Schema::banking();
            apply_schema(&conn, &schema).context("failed to apply schema")?;
            println!("Applied {} schema statements", schema.len());

            if let (Some(login), Some(password)) = (admin_login, admin_password) {
                let id = AccountService::new(repo).register(
                    Role::Manager,
                    "Admin",
                    "Admin",
                    &login,
                    &password,
                )?;
                println!("Created manager `{login}` with id {id}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Export { keep_going } => {
            let policy = if keep_going {
                FailurePolicy::Continue
            } else {
                config.failure_policy
            };
            export(repo, &config.backup_dir, policy)
        }
        Commands::NextPan => {
            println!("{}", repo.next_pan()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::SignIn {
            role,
            login,
            password,
        } => {
            match AccountService::new(repo).sign_in(role.into(), &login, &password) {
                Ok(true) => {
                    println!("Signed in as `{login}`");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(false) | Err(RepoError::PasswordMismatch) => {
                    eprintln!("Invalid login or password");
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => Err(err.into()),
            }
        }
        Commands::Register {
            role,
            name,
            surname,
            login,
            password,
        } => {
            let id = AccountService::new(repo).register(
                role.into(),
                &name,
                &surname,
                &login,
                &password,
            )?;
            println!("Registered `{login}` with id {id}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::IssueCard {
            client_id,
            pin,
            cvv,
            validity,
            balance,
        } => {
            if !(1000..=9999).contains(&pin) {
                bail!("PIN must have four digits");
            }
            let card = AccountService::new(repo).issue_card(&IssueCardRequest {
                client_id,
                pin,
                cvv,
                validity,
                opening_balance: balance,
            })?;
            println!("Issued card {} to {}", card.pan, card.holder_name);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn export(
    repo: SqliteBankRepository<'_>,
    backup_dir: &Path,
    policy: FailurePolicy,
) -> Result<ExitCode> {
    let service = ExportService::new(repo, BackupWriter::new(backup_dir));
    let report = service.export_all(policy);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(export) => println!(
                "{:<14} {:>6} rows  {}",
                outcome.kind.as_str(),
                export.rows,
                export.write.path().display()
            ),
            Err(err) => println!("{:<14} FAILED  {err}", outcome.kind.as_str()),
        }
    }

    if report.is_success() {
        info!("event=cli_export module=cli status=ok");
        return Ok(ExitCode::SUCCESS);
    }
    let skipped = EntityKind::ALL.len() - report.outcomes.len();
    if skipped > 0 {
        eprintln!("Export halted; {skipped} table(s) not exported");
    }
    Ok(ExitCode::FAILURE)
}
