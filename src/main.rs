use clap::Parser;
use case_forms::cli::commands::{cmd_graph, cmd_open, cmd_propagate};
use case_forms::cli::config::{Cli, Commands, TOKEN_ENV, URL_ENV, load_config, resolve_setting};
use case_forms::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve server settings: CLI > config > env
    let base_url = resolve_setting(
        cli.base_url.as_deref(),
        config.server.base_url.as_deref(),
        URL_ENV,
    );
    let token = resolve_setting(cli.token.as_deref(), config.server.token.as_deref(), TOKEN_ENV);

    let tracer = match cli.trace.as_deref().or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    match cli.command {
        Commands::Graph { view } => {
            cmd_graph(&view, cli.verbose)?;
        }
        Commands::Propagate {
            view,
            reference,
            value,
            options,
        } => {
            cmd_propagate(
                &view,
                &reference,
                &value,
                options.as_deref(),
                &tracer,
                cli.verbose,
            )?;
        }
        Commands::Open {
            assignment,
            case,
            action,
        } => {
            let base_url = base_url.ok_or_else(|| {
                format!("No case engine URL: pass --base-url, set server.base_url or {}", URL_ENV)
            })?;
            cmd_open(
                &base_url,
                token.as_deref(),
                &assignment,
                &case,
                action.as_deref(),
                config.session.validate_on_submit,
                tracer,
                cli.verbose,
            )?;
        }
    }

    Ok(())
}
