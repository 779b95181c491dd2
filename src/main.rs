//! git-docker - browse, preview and commit the history of one document
//!
//! # Usage
//! ```bash
//! git-docker log painting.kra                 # Last 10 commits touching the file
//! git-docker show painting.kra <REV> -o old.kra
//! git-docker thumbnail painting.kra <REV> -o preview.png
//! git-docker open painting.kra <REV>          # Open an old version in its default app
//! git-docker status painting.kra              # Is there anything to commit?
//! git-docker commit painting.kra -m "Ink the background"
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_docker::{CommitOutcome, Preview, TrackedDocument};

/// Browse, preview and commit the git history of a single document
#[derive(Parser)]
#[command(name = "git-docker")]
#[command(about = "Git history for a single document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most recent commits that changed the file
    Log {
        path: PathBuf,

        /// Print the commits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the file's exact content at a revision
    Show {
        path: PathBuf,
        revision: String,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Save the preview thumbnail of a revision
    Thumbnail {
        path: PathBuf,
        revision: String,

        /// Destination image, format chosen by extension
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Open a revision in the default application until Enter is pressed
    Open { path: PathBuf, revision: String },
    /// Report whether the file has changes to commit
    Status { path: PathBuf },
    /// Commit the current version of the file
    Commit {
        path: PathBuf,

        /// Commit message
        #[arg(short, long)]
        message: String,
    },
}

fn open_session(path: PathBuf) -> TrackedDocument {
    match TrackedDocument::open(&path) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("✗ {}", git_docker::Status::from(&e));
            eprintln!("  Path: {}", path.display());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

fn fail(session: &TrackedDocument) -> ! {
    eprintln!("✗ {}", session.status());
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Log { path, json } => {
            let session = open_session(path);

            if json {
                println!("{}", serde_json::to_string_pretty(session.commits())?);
                return Ok(());
            }

            if !session.is_tracked() {
                println!("{}", session.status());
                return Ok(());
            }

            for commit in session.commits() {
                println!(
                    "{}  {}  ({}, {})",
                    &commit.id[..7],
                    commit.summary,
                    commit.relative_time,
                    commit.author
                );
            }
        }
        Commands::Show { path, revision, output } => {
            let mut session = open_session(path);

            let Some(bytes) = session.content(&revision)? else {
                eprintln!("✗ {} did not exist at {}", session.path().display(), revision);
                std::process::exit(1);
            };

            match output {
                Some(output) => std::fs::write(&output, &bytes)?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Thumbnail { path, revision, output } => {
            let mut session = open_session(path);

            match session.preview(&revision)? {
                Preview::Ready(thumbnail) => {
                    thumbnail.save(&output)?;
                    println!(
                        "✓ Saved {}x{} thumbnail to {}",
                        thumbnail.width(),
                        thumbnail.height(),
                        output.display()
                    );
                }
                Preview::Unavailable(_) => fail(&session),
            }
        }
        Commands::Open { path, revision } => {
            let mut session = open_session(path);

            let Some(copy) = session.materialize(&revision)? else {
                eprintln!("✗ {} did not exist at {}", session.path().display(), revision);
                std::process::exit(1);
            };

            println!("  Revision: {}", revision);
            println!("  Copy:     {}", copy.display());
            if let Err(e) = open::that(&copy) {
                eprintln!("  Warning: Could not open {}: {}", copy.display(), e);
            }

            println!();
            println!("  Press Enter to remove the temporary copy");
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;

            session.close()?;
        }
        Commands::Status { path } => {
            let mut session = open_session(path);

            if session.is_committable()? {
                println!("✓ {} has changes to commit", session.path().display());
            } else {
                println!("{}", git_docker::Status::NotModified);
            }
        }
        Commands::Commit { path, message } => {
            let mut session = open_session(path);

            match session.commit(&message)? {
                CommitOutcome::Committed(record) => {
                    println!("✓ {}", session.status());
                    println!("  {}  {}", &record.id[..7], record.summary);
                }
                CommitOutcome::EmptyMessage | CommitOutcome::NotModified => fail(&session),
            }
        }
    }

    Ok(())
}
