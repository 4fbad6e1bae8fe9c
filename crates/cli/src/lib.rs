mod derive;
mod output;
mod platform;
mod resolve;
mod watch;

use clap::{Parser, Subcommand};
use modscope_api::ArtifactId;
use modscope_core::project::ProjectLayout;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "modscope",
    version,
    about = "Resolve the module names of Java compilation roots",
    long_about = "Modscope names jars, class folders and JDK platform modules the way the Java \
                  module system does: declared descriptor first, then the Automatic-Module-Name \
                  manifest attribute, then a name derived from the file name. Results are cached \
                  and invalidated when the underlying files change."
)]
pub struct Cli {
    /// Project layout file (defaults to the nearest modscope.json above the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Never parse module-info.java of projects that are not fully indexed
    #[arg(long, global = true)]
    pub no_source_fallback: bool,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the module name of roots given as paths or URLs
    #[command(
        long_about = "Each ROOT is a jar/zip/jmod file, a class folder, or a jar:/jrt: URL. \
                            With --scan, directories are searched for archives instead."
    )]
    Resolve {
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<String>,

        /// Resolve every archive found below the given directories
        #[arg(long)]
        scan: bool,
    },
    /// Show the automatic module name derived from file names
    Derive {
        #[arg(value_name = "FILE_NAME", required = true)]
        names: Vec<String>,
    },
    /// List the platform modules of a JDK
    Platform {
        /// JDK home (defaults to JAVA_HOME, then common install locations)
        #[arg(long, value_name = "DIR")]
        java_home: Option<PathBuf>,
    },
    /// Resolve roots and print their names again whenever they change
    Watch {
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<String>,

        /// Polling interval of the cache in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}

/// Options every command shares.
pub struct Settings {
    pub layout: Option<ProjectLayout>,
    pub allow_source_fallback: bool,
    pub json: bool,
}

impl Settings {
    fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let layout_path = match &cli.layout {
            Some(path) => Some(path.clone()),
            None => ProjectLayout::discover(&std::env::current_dir()?),
        };
        let layout = match layout_path {
            Some(path) => {
                tracing::info!("Using layout {}", path.display());
                Some(ProjectLayout::load(&path)?)
            }
            None => None,
        };
        Ok(Self {
            layout,
            allow_source_fallback: !cli.no_source_fallback,
            json: cli.json,
        })
    }
}

/// A root given on the command line: a URL, or a path to a folder or archive.
pub fn parse_root(arg: &str) -> Result<ArtifactId, Box<dyn std::error::Error>> {
    if arg.contains(":/") && !std::path::Path::new(arg).exists() {
        return Ok(ArtifactId::parse(arg)?);
    }
    let path = std::fs::canonicalize(arg)?;
    Ok(ArtifactId::from_path(&path)?)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = modscope_runtime::init_logging("cli", false);
    let settings = Settings::from_cli(&cli)?;

    match cli.command {
        Commands::Resolve { roots, scan } => resolve::run(&settings, &roots, scan),
        Commands::Derive { names } => derive::run(&settings, &names),
        Commands::Platform { java_home } => platform::run(&settings, java_home),
        Commands::Watch { roots, interval_ms } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(watch::run(&settings, &roots, interval_ms))
        }
    }
}
