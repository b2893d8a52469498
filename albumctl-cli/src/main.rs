//! albumctl CLI - PostgreSQL walkthrough for the albums table
//!
//! Connects with `DB_*` settings (or `--url` / `DATABASE_URL`), waits until
//! the database answers, then runs the full walkthrough (`demo`) or a
//! single gateway operation (`init`, `add`, `get`, `list`).

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

use commands::{AddArgs, ConnectArgs, DemoArgs, GetArgs, ListArgs, Session};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "albumctl",
    author,
    version,
    about = "Connect to PostgreSQL, create the albums table, insert and query albums",
    long_about = "Reads DB_USER, DB_PASSWD, DB_HOST, DB_PORT and DB_NAME (from the environment \
                  or a .env file), polls until the database is reachable, and runs album \
                  operations against it."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    connect: ConnectArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the whole walkthrough: wait, create table, insert samples, query
    Demo(DemoArgs),
    /// Wait until the database answers a probe
    Wait,
    /// Create the albums table if it does not exist
    Init,
    /// Insert one album
    Add(AddArgs),
    /// Look up the first album with an exact title
    Get(GetArgs),
    /// List every album by an exact artist name
    List(ListArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug })?;

    let command = match cli.command {
        Commands::Completions(args) => return run_completions(args),
        command => command,
    };

    // A descriptor that cannot be opened ends the process here, non-zero.
    let session = Session::open(&cli.connect)?;

    let outcome = match command {
        Commands::Demo(args) => commands::run_demo(&session, args).await,
        Commands::Wait => session.wait().await.map(|_| ()),
        Commands::Init => commands::run_init(&session).await,
        Commands::Add(args) => commands::run_add(&session, args).await,
        Commands::Get(args) => commands::run_get(&session, args).await,
        Commands::List(args) => commands::run_list(&session, args).await,
        Commands::Completions(_) => Ok(()),
    };

    session.close().await;
    outcome
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
