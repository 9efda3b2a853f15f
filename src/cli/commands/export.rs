use crate::api::ActivityApi;
use crate::cli::commands::Context;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub async fn handle<A: ActivityApi>(
    api: &A,
    ctx: &Context,
    id: i64,
    file: &str,
    force: bool,
) -> AppResult<()> {
    let pool = ctx.open_log()?;
    ExportLogic::export(api, &pool, id, file, force, ctx.now()).await?;
    Ok(())
}
