use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};

/// Compiles DHDL source into a hex-encoded fabric bitstream.
#[derive(Parser, Debug)]
#[command(name = "dhdl", version, about)]
struct Args {
    /// Source file to compile, or "-" for stdin.
    #[arg(default_value = "-")]
    infile: String,

    /// Where to write the hex-encoded bitstream, or "-" for stdout.
    #[arg(default_value = "-")]
    outfile: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn read_source(infile: &str) -> Result<String> {
    let mut buf = String::new();
    if infile == "-" {
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading source from stdin")?;
    } else {
        buf = std::fs::read_to_string(infile)
            .with_context(|| format!("reading source from {infile:?}"))?;
    }
    Ok(buf)
}

fn write_output(outfile: &str, hex: &str) -> Result<()> {
    if outfile == "-" {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{hex}").context("writing bitstream to stdout")?;
    } else {
        std::fs::write(outfile, format!("{hex}\n"))
            .with_context(|| format!("writing bitstream to {outfile:?}"))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(log_level(args.verbose))
        .init();

    let source = read_source(&args.infile)?;
    let bitstream = dhdl::compile(&source)?;
    write_output(&args.outfile, &hex::encode(bitstream))?;
    Ok(())
}
