use clap::Parser;
use color_eyre::Result;
use logstash_exporter::{
    init_errors,
    init_logging,
    run,
    VERSION,
};
use logstash_exporter_config::{
    Args,
    Config,
};
use tracing::{
    debug,
    info,
};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            err.print().ok();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    if args.version {
        println!("{VERSION}");
        return Ok(());
    }

    init_errors()?;
    let config = Config::new(args)?;
    init_logging(config.log_level, config.log_format)?;

    match dotenv {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(err) => debug!("no .env file loaded: {err}"),
    }

    info!(
        version = VERSION,
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "starting logstash-exporter"
    );

    run(config).await
}
