use clap::{Parser, Subcommand, ValueEnum};
use modifier_attrs::{Build, Dialect, FileStatus, Options, Pipeline, Summary};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "modattr")]
#[command(about = "modattr - expand modifier attributes into prefixed utility classes")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Single-modifier variants emitted per token for nested chains
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Do not add the artifact to .gitignore
    #[arg(long, global = true)]
    no_gitignore: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a single file and print the result
    Rewrite {
        /// Path to a source file
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON with the collected classes
        #[arg(long)]
        json: bool,

        /// Attribute convention (defaults to the file extension's, or `class` for stdin)
        #[arg(long, value_enum)]
        dialect: Option<DialectArg>,
    },
    /// Rewrite every source file under a directory into an output directory
    Build {
        /// Source directory
        src: PathBuf,

        /// Where rewritten files are written
        #[arg(long)]
        out_dir: PathBuf,

        /// Artifact path (overrides the config)
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Only collect generated classes and write the artifact
    Scan {
        /// Source directory
        src: PathBuf,

        /// Artifact path (overrides the config)
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Class,
    ClassName,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Class => Dialect::Class,
            DialectArg::ClassName => Dialect::ClassName,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut options = match load_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Rewrite { file, stdin, json, dialect } => {
            let pipeline = match Pipeline::new(options) {
                Ok(pipeline) => pipeline,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            };
            if stdin {
                rewrite_stdin(&pipeline, json, dialect.map_or(Dialect::Class, Dialect::from));
            } else if let Some(path) = file {
                rewrite_file(&pipeline, &path, json, dialect.map(Dialect::from));
            } else {
                eprintln!("Error: provide a file or use --stdin");
                std::process::exit(1);
            }
        }
        Commands::Build { src, out_dir, artifact } => {
            if let Some(artifact) = artifact {
                options.artifact = artifact;
            }
            run_tree(options, &src, Some(&out_dir));
        }
        Commands::Scan { src, artifact } => {
            if let Some(artifact) = artifact {
                options.artifact = artifact;
            }
            run_tree(options, &src, None);
        }
    }
}

fn load_options(cli: &Cli) -> modifier_attrs::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };

    if let Some(depth) = cli.max_depth {
        options.max_modifier_depth = depth;
    }
    if cli.no_gitignore {
        options.gitignore = false;
    }

    Ok(options)
}

fn rewrite_stdin(pipeline: &Pipeline, json_output: bool, dialect: Dialect) {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error: failed to read stdin: {e}");
        std::process::exit(1);
    }

    let result = pipeline.transform(&source, dialect);
    print_result(&result, json_output);
}

fn rewrite_file(pipeline: &Pipeline, path: &Path, json_output: bool, dialect: Option<Dialect>) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    let dialect = dialect.unwrap_or_else(|| pipeline.options().dialect_for(path));
    let result = pipeline.transform(&source, dialect);
    print_result(&result, json_output);
}

fn print_result(result: &modifier_attrs::TransformResult, json_output: bool) {
    if json_output {
        match serde_json::to_string(result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", result.code);
    }
}

fn run_tree(options: Options, src: &Path, out_dir: Option<&Path>) {
    if !src.is_dir() {
        eprintln!("Error: {} is not a directory", src.display());
        std::process::exit(1);
    }

    let mut build = match Build::new(options) {
        Ok(build) => build,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let result = build.run(src, out_dir, |rel, status| {
        let shown = match out_dir {
            Some(out_dir) => out_dir.join(rel),
            None => rel.to_path_buf(),
        };
        print_file(&shown.display().to_string(), status);
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if summary.files() == 0 {
        eprintln!("No source files found in {}", src.display());
        std::process::exit(1);
    }

    print_summary(&summary, build.artifact(), start.elapsed());
}

fn print_file(path: &str, status: FileStatus) {
    let is_tty = io::stderr().is_terminal();
    let (mark, color) = match status {
        FileStatus::Transformed => ("✓", "\x1b[32m"),
        FileStatus::Unchanged => ("·", "\x1b[2m"),
        FileStatus::Failed => ("✗", "\x1b[31m"),
    };

    if is_tty {
        eprintln!("  {color}{mark}\x1b[0m {path}");
    } else {
        eprintln!("  {mark} {path}");
    }
}

fn print_summary(summary: &Summary, artifact: &Path, elapsed: Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if summary.files() == 1 { "file" } else { "files" };
    let line = format!(
        "Processed {} {files_word} ({} rewritten, {} failed) in {time_str}; {} classes in {}",
        summary.files(),
        summary.transformed,
        summary.failed,
        summary.classes,
        artifact.display(),
    );

    if is_tty {
        eprintln!("\n\x1b[1m✨ {line}\x1b[0m");
    } else {
        eprintln!("\n✨ {line}");
    }
}

fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
