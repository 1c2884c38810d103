use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(help = "The source directory.")]
    source: PathBuf,
    #[arg(short, long, default_value = ".", help = "The destination directory")]
    dest: PathBuf,
    #[arg(
        short,
        long,
        help = "The site configuration. Defaults to `folio.yaml` in the source directory"
    )]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize Logging.
    let log_environ = env_logger::Env::new()
        .filter("FOLIO_LOG")
        .write_style("FOLIO_LOG_STYLE");
    let mut log_builder = env_logger::Builder::new();

    log_builder.filter_level(log::LevelFilter::Info);
    log_builder.parse_env(log_environ);
    log_builder.init();

    // Parse Arguments.
    let args = Args::parse();

    let config_path = args
        .config
        .unwrap_or_else(|| args.source.join(folio::files::CONFIG_FILE));
    let config = folio::config::Config::load(&config_path)?;

    log::info!("Beginning to process {:?}", args.source);
    log::info!("Outputting to {:?}", args.dest);

    let published = folio::files::FileDispatcher::new(config).handle_files(&args.source, &args.dest)?;

    log::info!("Done. Published {} essays.", published.len());

    Ok(())
}
