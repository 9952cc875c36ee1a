use clap::Parser;
use shutterfolio_lib::bootstrap::{self, tracing::init_tracing_subscriber};
use shutterfolio_lib::cli::{self, Cli};
use sf_core::ports::AppDirsPort;
use sf_platform::DirsAppDirsAdapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let config = bootstrap::resolve_config(args.config.as_deref())?;
    match DirsAppDirsAdapter::new().get_app_dirs() {
        Ok(dirs) => init_tracing_subscriber(&dirs.logs_dir())?,
        Err(err) => eprintln!("Log directory unavailable, file logging disabled: {err}"),
    }

    let site = bootstrap::wire_site(config).await?;
    let output = cli::run(&site, args.command).await?;
    println!("{output}");
    Ok(())
}
