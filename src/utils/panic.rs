//! Panic and error report hooks for the CLI

use std::panic::{self, PanicHookInfo};
use std::process;

use color_eyre::config::{HookBuilder, PanicHook};
use color_eyre::eyre::Result;

fn report_section() -> String {
    match env!("CARGO_PKG_REPOSITORY") {
        "" => format!(
            "{} {} hit an internal error. Rerun with HASHVIEW_LOGLEVEL=debug and attach the log file to a report",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
        repository => format!("Router internal error. Please file an issue at {repository}"),
    }
}

/// Install color-eyre's report hook and a panic hook that logs the report,
/// prints it for the user and exits with a failure status
pub fn initialize_panic_handler() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(report_section())
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    panic::set_hook(Box::new(move |info| {
        let report = panic_hook.panic_report(info).to_string();
        tracing::error!("panic: {}", strip_ansi_escapes::strip_str(&report));
        present(&panic_hook, info);
        process::exit(libc::EXIT_FAILURE);
    }));
    Ok(())
}

#[cfg(not(debug_assertions))]
fn present(panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    use human_panic::{handle_dump, print_msg, Metadata};

    let meta = Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .authors(env!("CARGO_PKG_AUTHORS").replace(':', ", "))
        .homepage(env!("CARGO_PKG_HOMEPAGE"));
    let dump = handle_dump(&meta, info);
    if let Err(e) = print_msg(dump, &meta) {
        eprintln!("cannot print crash summary: {e}");
    }
    eprintln!("{}", panic_hook.panic_report(info));
}

#[cfg(debug_assertions)]
fn present(_panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .verbosity(better_panic::Verbosity::Full)
        .create_panic_handler()(info);
}
