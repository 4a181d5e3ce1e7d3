use anyhow::Result;
use clap::{Parser, Subcommand};
use dit::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "dit",
    version = "0.1.0",
    about = "A small content-addressed version control engine",
    long_about = "dit snapshots file trees into immutable content-addressed objects, \
    arranges them as a commit graph with named branches, and merges divergent \
    histories with three-way conflict detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Initialize a new repository in the current directory")]
    Init,
    #[command(about = "Stage files, or '.' for everything new, modified or deleted")]
    Add {
        #[arg(index = 1, required = true, help = "Paths to stage, or '.'")]
        paths: Vec<String>,
    },
    #[command(about = "Record the staged snapshot as a commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(about = "Show the working tree status")]
    Status,
    #[command(about = "Show commit history, newest first")]
    Log,
    #[command(about = "Show changes of a file against HEAD")]
    Diff {
        #[arg(index = 1, help = "The file to diff")]
        path: String,
        #[arg(long, help = "Two-column rendering")]
        side_by_side: bool,
    },
    #[command(about = "Switch to a branch or commit, or restore files from HEAD")]
    Checkout {
        #[arg(help = "Branch name, commit hash or HEAD")]
        target: Option<String>,
        #[arg(last = true, num_args = 1.., help = "Files to restore from HEAD (after --)")]
        files: Vec<String>,
    },
    #[command(about = "Create a branch, or list branches when no name is given")]
    Branch {
        #[arg(index = 1, allow_hyphen_values = true, help = "Name of the branch to create")]
        name: Option<String>,
    },
    #[command(about = "Merge a branch into the current one")]
    Merge {
        #[arg(index = 1, help = "The branch to merge in")]
        branch: Option<String>,
        #[arg(long, help = "Abort the in-progress merge")]
        abort: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let pwd = std::env::current_dir()?;
    let repository = Repository::new(pwd, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::Init => repository.init()?,
        Commands::Add { paths } => repository.add(paths)?,
        Commands::Commit { message } => repository.commit(message)?,
        Commands::Status => repository.status()?,
        Commands::Log => repository.log()?,
        Commands::Diff {
            path,
            side_by_side,
        } => repository.diff(path, *side_by_side)?,
        Commands::Checkout { target, files } => match (target, files.as_slice()) {
            (Some(target), []) => repository.checkout(target)?,
            (None, files) if !files.is_empty() => {
                for file in files {
                    repository.checkout_file(file)?;
                }
            }
            _ => anyhow::bail!("usage: dit checkout <target> | dit checkout -- <file>"),
        },
        Commands::Branch { name } => repository.branch(name.as_deref())?,
        Commands::Merge { branch, abort } => match (branch, abort) {
            (_, true) => repository.abort_merge()?,
            (Some(branch), false) => repository.merge(branch)?,
            (None, false) => anyhow::bail!("usage: dit merge <branch> | dit merge --abort"),
        },
    }

    Ok(())
}
