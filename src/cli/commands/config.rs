use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        set_token,
    } = &cli.command
    else {
        return Ok(());
    };

    let path = cli.config.clone().unwrap_or_else(Config::config_file);

    if let Some(token) = set_token {
        let mut stored = Config::load_file(&path)?;
        stored.token = Some(token.trim().to_string());
        stored.save(&path)?;

        if let Ok(pool) = DbPool::new(&cfg.database) {
            log::oplog_quiet(&pool.conn, "config", "token", "Bearer token updated");
        }
        success(format!("Token stored in {}", path.display()));
    }

    if *print_config {
        let mut shown = cfg.clone();
        shown.token = shown.token.map(|t| mask_token(&t));
        println!("📄 Current configuration ({}):\n", path.display());
        println!("{}", serde_yaml::to_string(&shown)?);
    }

    Ok(())
}

/// Keep the last four characters visible.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
