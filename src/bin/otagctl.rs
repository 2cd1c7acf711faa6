#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[macro_use] extern crate serde;
extern crate clap;
extern crate env_logger;
extern crate serde_json;
extern crate serde_yaml;
extern crate otag;

use clap::{App, Arg, SubCommand, ArgMatches};
use otag::{import::*, db::export::*};
use otag::app::api::TagLayer;
use otag::util::arg::Options;
use std::io::{self, Write};

mod defaults {
    pub const DATABASE_PATH: &'static str = "tags.sqlite";
    pub const CONFIG_PATH: &'static str = "otag.yaml";
}

pub mod error {
    #[derive(Debug, Fail)]
    pub enum Error {
        #[fail(display = "argument error: '{}'", message)]
        ArgumentError { message: String, },
        #[fail(display = "configuration error: '{}'", message)]
        ConfigurationError { message: String, },
    }
}
use error::{Error as E};

/// Command-line config options, optionally preloaded
/// from a yaml file
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: Option<String>,
}

impl Config {

    pub fn read(path: &str) -> Res<Self> {
        use std::io::prelude::*;
        use std::fs::File;
        trace!("reading configuration");
        let mut file = match File::open(path) {
            Ok(file) => file,
            // a missing config file is not an error
            Err(_) => return Ok(Self { database: None }),
        };
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        serde_yaml::from_str(&buffer)
            .map_err(|e| E::ConfigurationError {
                message: format!("{:?}", e)
            }.into())
    }
}

/// A cli command
#[derive(Debug, Clone)]
pub enum Command<'a> {
    Init,
    List(Option<&'a str>),
    Delete(Vec<&'a str>),
    Clean,
    Nop,
}

#[derive(Serialize)]
struct TagRow<'a> {
    id: i64,
    kind: &'static str,
    name: &'a str,
}

/// Rusts stdlib has the annoying habit of
/// producing broken pipe errors when used
/// in shell pipelines. We're not too worried
/// about broken pipes, so just discard these
/// errors entirely.
fn hide_spurious_pipe_errors<T>(res: Result<T, std::io::Error>) -> Res<()> {
    match res {
        Ok(_) => Ok(()),
        Err(e) => {
            match e.kind() {
                std::io::ErrorKind::BrokenPipe => Ok(()),
                _ => Err(e.into())
            }
        }
    }
}

fn list(layer: &TagLayer, format: Option<&str>) -> Res<()> {
    let mut tags = layer.all_tags()?;
    tags.sort_by(|a, b| a.name.partial_cmp(&b.name).unwrap_or(std::cmp::Ordering::Equal));
    let output = match format {
        Some("json") => {
            let rows: Vec<TagRow> = tags.iter()
                .map(|t| TagRow { id: t.id, kind: t.kind().as_str(), name: &t.name })
                .collect();
            let mut s = serde_json::to_string_pretty(&rows)?;
            s.push('\n');
            s
        }
        Some("plain") | None => {
            tags.iter().fold(String::new(), |mut s, t| {
                s.push_str(&format!("{}\t{}\t{}\n", t.id, t.kind().as_str(), t.name));
                s
            })
        }
        Some(e) => { return Err(E::ArgumentError { message: e.into() }.into()) }
    };
    hide_spurious_pipe_errors(write!(io::stdout(), "{}", output))?;
    Ok(())
}

fn cli(options: &ArgMatches) -> Res<()> {
    let o = Options::new(options);
    let oo;
    let config = Config::read(o.opt("config").unwrap_or(defaults::CONFIG_PATH))?;
    let database = o.opt("database").map(|s| s.to_string())
        .or(config.database)
        .unwrap_or(defaults::DATABASE_PATH.to_string());
    let command = {
        if let Some(_options) = options.subcommand_matches("init") {
            Command::Init
        } else if let Some(options) = options.subcommand_matches("list") {
            oo = Options::new(options); Command::List(oo.opt("format"))
        } else if let Some(options) = options.subcommand_matches("delete") {
            oo = Options::new(options); Command::Delete(oo.vec("NAME"))
        } else if let Some(_options) = options.subcommand_matches("clean") {
            Command::Clean
        } else { Command::Nop }
    };
    info!("command: {:?}", command);
    info!("database: {}", &database);
    let pool = db::Connection::new_pool(&database, 2)?;
    let layer = TagLayer::new(db::Connection(pool.get().expect("database connection failure")));
    match command {
        Command::Init => {
            db::initialize(&layer.connection)?;
            info!("database initialized");
        }
        Command::List(format) => {
            list(&layer, format)?;
        }
        Command::Delete(names) => {
            let deleted = layer.delete_tags(&names)?;
            info!("deleted: {} Tag(s)", deleted);
        }
        Command::Clean => {
            layer.clean()?;
        }
        Command::Nop => {}
    }
    Ok(())
}

fn main() -> Res<()> {

    env_logger::init();
    let options =
        App::new("otagctl")
        .version("0.1")
        .about("object tagging maintenance tools")
        .author("Felix V.")

        .arg(Arg::with_name("database")
            .short("d")
            .long("database")
            .help("Use the given sqlite database FILE")
            .value_name("FILE")
            .takes_value(true))

        .arg(Arg::with_name("config")
            .short("c")
            .long("config")
            .help("Read configuration from FILE")
            .value_name("FILE")
            .takes_value(true))

        .subcommand(SubCommand::with_name("init")
            .about("Provision the tag schema"))

        .subcommand(SubCommand::with_name("list")
            .about("List tags")
            .arg(Arg::with_name("format")
                .short("f")
                .long("format")
                .help("Output format: plain or json")
                .value_name("FORMAT")
                .takes_value(true)))

        .subcommand(SubCommand::with_name("delete")
            .about("Delete custom tags by name")
            .arg(Arg::with_name("NAME")
                .help("The tags to delete")
                .required(true)
                .takes_value(true)
                .multiple(true)))

        .subcommand(SubCommand::with_name("clean")
            .about("Forget custom tags that no longer tag anything"))

        .get_matches();

    match cli(&options) {
        Ok(()) => {}
        Err(e) => { error!("{:?}", e); }
    }

    Ok(())
}
