mod cli;

use terrayml::convert::{Converter, Options};
use terrayml::value::Value;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TERRAYML_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Convert(convert_cli) => convert(convert_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn convert(cli: cli::ConvertCommand) -> anyhow::Result<()> {
    anyhow::ensure!(
        cli.source.is_dir(),
        "Source {} is not a directory",
        cli.source.display()
    );

    let options = Options {
        config_name: cli.config_name,
        scope: cli.merge.scope.into(),
        scan_children: !cli.single,
        keep_sources: cli.keep_sources,
        ..Default::default()
    };

    let report = Converter::new(options).convert_tree(&cli.source, &cli.destination)?;

    for converted in &report.converted {
        println!("{}", converted.output.display());
    }

    for issue in &report.issues {
        eprintln!("skipped {issue}");
    }

    Ok(())
}

/// (terrayml-)developer utilities
///
/// Prints one stage of the conversion pipeline for a single file
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::Stage::*;

    let converter = Converter::new(Options {
        scope: cli.merge.scope.into(),
        ..Default::default()
    });

    let input = std::fs::read_to_string(&cli.file)?;
    let mut tree = converter.parse(&input, &cli.file)?;

    if !matches!(cli.stage, Tree) {
        converter.normalize(&mut tree);
    }

    match cli.stage {
        Tree | Normalized => println!("{tree:#?}"),
        Json => println!("{}", terrayml::codec::to_json(&Value::Object(tree))?),
        Yaml => print!("{}", converter.encode(tree, &cli.file)?),
        Reshaped => {
            let yaml = converter.encode(tree, &cli.file)?;
            print!(
                "{}",
                terrayml::reshape::reshape(&yaml, &converter.options().layout)
            );
        }
    }

    Ok(())
}
