//! god - generate getters and setters for Go structs

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use god::{generate, AccessorKind, Config, FilenameTemplate, GoFileWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "god")]
#[command(
    about = "A code generator for go",
    long_about = "Run through go:generate. Add this to a source file (user.go, for example):\n\n    //go:generate god getter -t User\n\nand run `go generate`; user_getter.go is written next to it.",
    version
)]
struct Cli {
    /// Source file holding the directive
    #[arg(long, env = "GOFILE", global = true)]
    gofile: Option<PathBuf>,
    /// Package name of the generated files
    #[arg(long, env = "GOPACKAGE", global = true)]
    gopackage: Option<String>,
    /// Package directory
    #[arg(short, long, default_value = ".", global = true)]
    workdir: PathBuf,
    /// Print the go generate environment and debug logs
    #[arg(long, global = true)]
    debug: bool,
    /// Output filename template
    #[arg(long, default_value = FilenameTemplate::DEFAULT, global = true)]
    filename: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate getter functions for specific struct
    Getter(StructArgs),
    /// Generate setter functions for specific struct
    Setter(StructArgs),
    /// Generate getter and setter functions for specific struct
    Data(StructArgs),
}

#[derive(Debug, Args)]
struct StructArgs {
    /// Name list for structs (default: every struct of the file)
    #[arg(short = 't', long = "struct", value_delimiter = ',')]
    structs: Vec<String>,
}

impl Commands {
    fn kinds(&self) -> &'static [AccessorKind] {
        match self {
            Commands::Getter(_) => &[AccessorKind::Getter],
            Commands::Setter(_) => &[AccessorKind::Setter],
            Commands::Data(_) => &[AccessorKind::Getter, AccessorKind::Setter],
        }
    }

    fn struct_names(&self) -> &[String] {
        match self {
            Commands::Getter(args) | Commands::Setter(args) | Commands::Data(args) => &args.structs,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.debug { "god=debug" } else { "god=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let filename_template = FilenameTemplate::parse(&cli.filename)?;
    let config = Config {
        package_name: cli.gopackage.clone().unwrap_or_default(),
        target_file: cli.gofile.clone().unwrap_or_default(),
        explicit_struct_names: cli.command.struct_names().to_vec(),
        debug: cli.debug,
        workdir: cli.workdir.clone(),
        filename_template,
    };

    if config.debug {
        println!("{}", config.debug_report(std::env::args()));
    }

    let kinds = cli.command.kinds();
    generate(&config, kinds, &GoFileWriter, |file| {
        println!(
            "Generate {} for struct {}, save as {}",
            file.kind, file.struct_name, file.file_name
        );
    })
    .with_context(|| {
        format!(
            "cannot generate accessors for {}",
            config.target_file.display()
        )
    })?;

    Ok(())
}
