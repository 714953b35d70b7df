use clap::Parser;
use cvmplot::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{circular, distance, gb2cds, genes, heatmap, phylotree, rectree, tnseq, typing},
    utils::{handle_error_and_exit, Result},
};
use std::{env, time};

fn disable_htslib_logging() {
    if env::var_os("CVMPLOT_ENABLE_HTSLIB_LOGGING").is_some() {
        log::debug!("CVMPLOT_ENABLE_HTSLIB_LOGGING is set, keeping htslib logging enabled");
        return;
    }
    unsafe {
        use rust_htslib::htslib::{htsLogLevel_HTS_LOG_OFF, hts_set_log_level};
        hts_set_log_level(htsLogLevel_HTS_LOG_OFF);
    }
}

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    disable_htslib_logging();
    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        FULL_VERSION,
        cli.command.name()
    );

    let start_timer = time::Instant::now();
    match cli.command {
        Command::Tnseq(args) => {
            log::trace!("Tnseq arguments: {:#?}", args);
            args.preflight()?;
            tnseq::tnseq(args)?
        }
        Command::Gb2cds(args) => {
            log::trace!("Gb2cds arguments: {:#?}", args);
            args.preflight()?;
            gb2cds::gb2cds(args)?
        }
        Command::Distance(args) => {
            log::trace!("Distance arguments: {:#?}", args);
            args.preflight()?;
            distance::distance(args)?
        }
        Command::Rectree(args) => {
            log::trace!("Rectree arguments: {:#?}", args);
            args.preflight()?;
            rectree::rectree(args)?
        }
        Command::Circular(args) => {
            log::trace!("Circular arguments: {:#?}", args);
            args.preflight()?;
            circular::circular(args)?
        }
        Command::Heatmap(args) => {
            log::trace!("Heatmap arguments: {:#?}", args);
            args.preflight()?;
            heatmap::heatmap(args)?
        }
        Command::Phylotree(args) => {
            log::trace!("Phylotree arguments: {:#?}", args);
            args.preflight()?;
            phylotree::phylotree(args)?
        }
        Command::Genes(args) => {
            log::trace!("Genes arguments: {:#?}", args);
            args.preflight()?;
            genes::genes(args)?
        }
        Command::Typing(args) => {
            log::trace!("Typing arguments: {:#?}", args);
            args.preflight()?;
            typing::typing(args)?
        }
    }

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
