use std::path::PathBuf;

use bistro_schema::EntityType;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bistro-admin")]
#[command(about = "Restaurant admin pages in the terminal")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Backend base URL (overrides BISTRO_API_URL and the config file)
	#[arg(long, global = true, value_name = "URL")]
	pub base_url: Option<String>,

	/// Config file to read instead of the default location
	#[arg(long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List entity types and their fields
	Entities,
	/// Show the list page of an entity
	List {
		entity: EntityType,
	},
	/// Load a record into its edit form
	Show {
		entity: EntityType,
		id: String,
	},
	/// Fill and submit a create form, then show the list
	Create {
		entity: EntityType,
		/// Field assignments as `field=value`
		#[arg(value_parser = parse_assignment)]
		fields: Vec<(String, String)>,
	},
	/// Fill and submit an edit form, then show the list
	Edit {
		entity: EntityType,
		id: String,
		/// Field assignments as `field=value`
		#[arg(value_parser = parse_assignment)]
		fields: Vec<(String, String)>,
	},
	/// Query the options of a relation field
	Options {
		entity: EntityType,
		field: String,
		/// Search term
		#[arg(default_value = "")]
		term: String,
	},
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
	let (field, value) = arg
		.split_once('=')
		.ok_or_else(|| format!("expected field=value, got {arg:?}"))?;
	let field = field.trim();
	if field.is_empty() {
		return Err(format!("missing field name in {arg:?}"));
	}
	Ok((field.to_string(), value.to_string()))
}
