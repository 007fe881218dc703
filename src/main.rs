use clap::Parser;
use color_eyre::eyre::Result;

use hashview::{
    infrastructure::{
        cli::{Cli, Command},
        config::Config,
        script::Script,
    },
    integration::replay::{ReplayOptions, ReplayRunner},
    utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    let config = Config::new()?;

    match args.command {
        Command::Replay {
            script,
            reduced_motion,
            fragment,
        } => {
            let script = Script::load(&script)?;
            let options = ReplayOptions {
                reduced_motion: reduced_motion.then_some(true),
                initial_fragment: fragment,
            };
            let report = ReplayRunner::new(config, options).run(&script).await?;
            for entry in &report.trace {
                println!("{}", serde_json::to_string(entry)?);
            }
            println!("{}", serde_json::to_string(&report.summary)?);
        }
        Command::Routes => {
            let routes = config.route_table()?;
            for (key, view) in routes.iter() {
                let gallery = if routes.is_gallery(key) { " (gallery)" } else { "" };
                println!("{key}\t{view}{gallery}");
            }
        }
        Command::Resolve { fragment } => {
            let target = config.route_table()?.resolve(&fragment);
            println!("{}", serde_json::to_string(&target)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
