use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_list::cli::Cli;
use todo_list::cmd::*;
use todo_list::config::Config;
use todo_list::db::Database;
use todo_list::fields::Status;
use todo_list::Result;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions don't need a store.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let config = Config::from_cli(&cli)?;
    let db_path = config.db_path.as_path();
    let mut db = Database::load(db_path);

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add { title, due, desc, priority, category, parent } =>
            cmd_add(&mut db, db_path, title, due, desc, priority, category, parent),

        Commands::List { priority, status, category, search, tree, limit } => {
            cmd_list(&db, criteria(priority, status, category, search), tree, limit);
            Ok(())
        }

        Commands::View { id, children } => cmd_view(&db, id, children),

        Commands::Update {
            id, title, desc, due, priority, category, parent,
            clear_desc, clear_due, clear_category, clear_parent,
        } => cmd_update(&mut db, db_path, id, title, desc, due, priority, category, parent,
                        clear_desc, clear_due, clear_category, clear_parent),

        Commands::Complete { id } => cmd_set_status(&mut db, db_path, id, Status::Completed),

        Commands::Reopen { id } => cmd_set_status(&mut db, db_path, id, Status::Pending),

        Commands::Delete { id } => cmd_delete(&mut db, db_path, id),

        Commands::Category { action } => cmd_category(&mut db, db_path, action),

        Commands::Stats { json, output } => cmd_stats(&db, json, output),

        Commands::Timeline { from, to, days, json } => cmd_timeline(&db, from, to, days, json),

        Commands::Trend { days } => cmd_trend(&db, days),

        Commands::Remind { dry_run } => cmd_remind(&mut db, db_path, &config.reminders, dry_run),

        Commands::Bulk { action } => cmd_bulk(&mut db, db_path, action),

        Commands::Clear { yes } => cmd_clear(&mut db, db_path, yes),
    }
}
