use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the operation-log database
pub fn handle(cli: &Cli) -> AppResult<()> {
    println!("⚙️  Initializing rvolunteer…");

    let cfg = Config::init_all(cli.config.as_deref(), cli.db.clone(), cli.test)?;

    let pool = DbPool::new(&cfg.database)?;
    println!("🗄️  Database   : {}", &cfg.database);
    println!("🌐 Backend    : {}", &cfg.api_base_url);

    log::oplog_quiet(
        &pool.conn,
        "init",
        "",
        &format!("Operation log initialized at {}", &cfg.database),
    );

    println!("🎉 rvolunteer initialization completed!");
    Ok(())
}
