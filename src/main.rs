use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fsim::{FileSystem, FsError, OpLog};

#[derive(Parser)]
#[command(name = "fsim", version, about = "In-memory file system simulator")]
struct Cli {
    /// State blob loaded before and saved after the operation.
    #[arg(short = 'f', long, global = true, default_value = "fs_state.json")]
    state_file: PathBuf,

    /// Append `operation,elapsed_ms` rows to this CSV file.
    #[arg(long, global = true)]
    telemetry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a file, building missing directories along the way.
    CreateFile {
        /// Directory to create the file in.
        path: String,
        name: String,
        #[arg(default_value = "")]
        content: String,
    },
    /// Print a file's content.
    ReadFile { path: String },
    /// Overwrite an existing file's content.
    WriteFile { path: String, content: String },
    /// Delete a file, or a directory with its entire contents.
    Delete { path: String },
    /// List a directory's immediate children.
    ListDir {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print whole-tree statistics.
    Stats,
    /// Copy a file or directory subtree.
    Copy { source: String, dest: String },
    /// Move a file or directory subtree.
    Move { source: String, dest: String },
    /// Rename a file or directory in place.
    Rename { path: String, new_name: String },
    /// Find entries under a directory whose name contains the term.
    Search { path: String, term: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn timed<T>(oplog: Option<&OpLog>, operation: &str, f: impl FnOnce() -> T) -> T {
    match oplog {
        Some(log) => log.time(operation, f),
        None => f(),
    }
}

fn run(cli: Cli) -> Result<(), FsError> {
    // A missing state file means a fresh tree; a corrupt one is a hard error.
    let mut fs = match FileSystem::load_state(&cli.state_file) {
        Ok(fs) => fs,
        Err(FsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => FileSystem::new(),
        Err(e) => return Err(e),
    };
    let oplog = cli.telemetry.as_ref().map(OpLog::new);
    let oplog = oplog.as_ref();

    match cli.command {
        Command::CreateFile {
            path,
            name,
            content,
        } => {
            timed(oplog, "create", || fs.create_file(&path, &name, &content))?;
            println!("File '{}' created at '{}'", name, path);
        }
        Command::ReadFile { path } => {
            let content = timed(oplog, "read", || fs.read_file(&path).map(str::to_owned))?;
            println!("{}", content);
        }
        Command::WriteFile { path, content } => {
            timed(oplog, "update", || fs.write_file(&path, &content))?;
            println!("File at '{}' updated", path);
        }
        Command::Delete { path } => {
            timed(oplog, "delete", || fs.delete(&path))?;
            println!("Deleted '{}'", path);
        }
        Command::ListDir { path } => {
            let listing = timed(oplog, "list", || fs.list_dir(&path));
            println!("Contents of '{}':", path);
            println!("Directories: {}", listing.directories.join(", "));
            println!("Files: {}", listing.files.join(", "));
        }
        Command::Stats => {
            let stats = timed(oplog, "stats", || fs.statistics());
            println!("File System Statistics:");
            println!("Total Files: {}", stats.total_files);
            println!("Total Directories: {}", stats.total_directories);
            println!("Total Size: {} bytes", stats.total_size);
        }
        Command::Copy { source, dest } => {
            timed(oplog, "copy", || fs.copy(&source, &dest))?;
            println!("Copied '{}' to '{}'", source, dest);
        }
        Command::Move { source, dest } => {
            timed(oplog, "move", || fs.move_entry(&source, &dest))?;
            println!("Moved '{}' to '{}'", source, dest);
        }
        Command::Rename { path, new_name } => {
            timed(oplog, "rename", || fs.rename(&path, &new_name))?;
            println!("Renamed '{}' to '{}'", path, new_name);
        }
        Command::Search { path, term } => {
            let hits = timed(oplog, "search", || fs.search(&path, &term));
            println!("Search results for '{}': {} hit(s)", term, hits.len());
            for hit in hits {
                match hit.size {
                    Some(size) => println!("{} {} ({} bytes)", hit.kind.as_str(), hit.name, size),
                    None => println!("{} {}", hit.kind.as_str(), hit.name),
                }
            }
        }
    }

    fs.save_state(&cli.state_file)
}
