pub mod api;
pub mod commands;
pub mod session;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrmbld_domain::note::NoteKind;

use crate::commands::App;

#[derive(Debug, Parser)]
#[command(
	version = scrmbld_cli::VERSION,
	rename_all = "kebab",
	styles = scrmbld_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Prints the Spotify authorization URL and remembers the PKCE verifier.
	Login,
	/// Completes a login with the code and state from the redirect.
	Callback {
		#[arg(long)]
		code: String,
		#[arg(long)]
		state: String,
	},
	Refresh,
	/// Lists saved albums, optionally registering them with the API.
	Albums {
		#[arg(long)]
		sync: bool,
	},
	Playlists,
	/// Lists the tracks of one playlist.
	Playlist {
		#[arg(long)]
		id: String,
	},
	#[command(subcommand)]
	Note(NoteCommand),
	Rate {
		#[arg(long)]
		track: String,
		#[arg(long)]
		rating: i32,
	},
	/// Scores an album from the ratings held locally.
	Score {
		#[arg(long)]
		album: String,
	},
	/// Replays notes whose remote save failed.
	Retry,
}

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
	Get {
		/// `track` or `album`.
		#[arg(long)]
		kind: NoteKind,
		#[arg(long)]
		id: String,
	},
	Save {
		/// `track` or `album`.
		#[arg(long)]
		kind: NoteKind,
		#[arg(long)]
		id: String,
		/// Blank content deletes the note.
		#[arg(long)]
		content: String,
	},
	Delete {
		/// `track` or `album`.
		#[arg(long)]
		kind: NoteKind,
		#[arg(long)]
		id: String,
	},
	/// Locks or unlocks an album note.
	Lock {
		#[arg(long)]
		id: String,
		#[arg(long, action = ArgAction::Set)]
		locked: bool,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = scrmbld_config::load(&args.config)?;
	init_tracing(&config)?;
	let app = App::new(&config)?;

	// Pending saves are replayed once per start; `retry` does its own pass and reports it.
	if !matches!(args.command, Command::Retry) {
		app.retry_pending().await?;
	}

	app.dispatch(args.command).await
}

fn init_tracing(config: &scrmbld_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
	Ok(())
}
