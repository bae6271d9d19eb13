//! Config subcommand handlers.

use flaresync_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for domain in &mut cfg.domains {
        if domain.token.is_some() {
            domain.token = Some(MASK.into());
        }
    }
    cfg
}

pub fn handle(ctx: &Context<'_>, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&ctx.config);
            let text = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render {
                message: e.to_string(),
            })?;
            let out = output::render_single(ctx.output(), &cfg, |_| text.trim_end().to_owned())?;
            output::print_output(&out, ctx.global.quiet);
        }
        ConfigCommand::Path => {
            if !ctx.path.exists() {
                eprintln!("(file does not exist yet)");
            }
            output::print_output(&ctx.path.display().to_string(), ctx.global.quiet);
        }
    }
    Ok(())
}
