#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client_config;
pub mod network;
pub mod tui;

mod client_main;

use std::path::PathBuf;

use clap::{Command, arg, value_parser};
use client_config::{ClientConfig, ConfigFile};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Citywar")
        .version(clap::crate_version!())
        .about("Citywar console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("client")
                .about("Join a game and play it from the terminal")
                .arg(arg!([server_address] "Server address, e.g. localhost:8000"))
                .arg(arg!([player] "Side to play: white or black"))
                .arg(
                    arg!(-c --config <config_file> "Path to the configuration file: yaml-serialized ClientConfig")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Print the current game and exit")
                .arg(arg!(<server_address> "Server address")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("client", sub_matches)) => {
            let file = match sub_matches.get_one::<PathBuf>("config") {
                Some(path) => ConfigFile::read(path)?,
                None => ConfigFile::default(),
            };
            let config = ClientConfig::resolve(
                file,
                sub_matches.get_one::<String>("server_address").map(String::as_str),
                sub_matches.get_one::<String>("player").map(String::as_str),
            )?;
            client_main::run(config)
        }
        Some(("status", sub_matches)) => {
            let address = sub_matches.get_one::<String>("server_address").unwrap();
            client_main::run_status(client_config::parse_server_address(address)?)
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
