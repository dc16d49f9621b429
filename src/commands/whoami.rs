use std::process::ExitCode;

use figkit_lib::output::{FigkitOutput, WhoamiOutput, FIGKIT_OUTPUT_VERSION};

use super::CommandContext;
use crate::formatting::{emit, render_error};

pub async fn run_whoami(ctx: &CommandContext) -> ExitCode {
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let user = match client.with_retry(|c| c.get_current_user()).await {
        Ok(user) => user,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    emit(
        FigkitOutput::Whoami(WhoamiOutput {
            version: FIGKIT_OUTPUT_VERSION.to_string(),
            user,
        }),
        ctx.format,
        ctx.output.clone(),
    )
}
