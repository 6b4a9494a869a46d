mod commands;
mod data;
mod deadline;
mod glob;
mod image;
mod options;

use std::process;

use structopt::StructOpt;

use crate::options::{Options, Subcommand};

fn main() {
    let options = Options::from_args();

    let log_level = match options.global.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let log_filter = format!("pixmargin={0},marginfill={0}", log_level);
    let log_env = env_logger::Env::default().default_filter_or(log_filter);

    env_logger::Builder::from_env(log_env)
        .format_module_path(false)
        .init();

    match run(options) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("{}", error_message(&err));
            process::exit(1);
        }
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    match options.command {
        Subcommand::Extend(extend_options) => commands::extend(extend_options)?,
        Subcommand::Batch(batch_options) => commands::batch(batch_options)?,
    }

    Ok(())
}

// Includes every layer of context, so "Couldn't process" says why.
fn error_message(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}
