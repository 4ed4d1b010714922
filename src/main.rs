//! Orchestrator (C10): two invocations, `make_base` and `process_requests`,
//! dispatching on `argv[1]`. Build mode populates a [`Catalogue`] from a
//! structured-value document on stdin and seals it into a binary snapshot;
//! serve mode loads that snapshot, builds the renderer and router once,
//! and answers a batch of queries read alongside it.
//!
//! Everything past argv/stdin/stdout/file IO — populating the catalogue,
//! parsing settings, and answering one request — lives in
//! [`transit_catalogue::dispatch`] so it can be exercised from integration
//! tests without going through a process boundary.

use std::io::{Read, Write};
use std::process::ExitCode;
use std::time::Instant;
use std::{env, fs, io};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{error, info};

use transit_catalogue::catalogue::Catalogue;
use transit_catalogue::dispatch::{self, dispatch, populate_catalogue, parse_render_settings, parse_routing_settings, parse_serialization_settings};
use transit_catalogue::json::{self, Node, NodeError};
use transit_catalogue::snapshot;
use transit_catalogue::transit::Router;

const USAGE: &str = "usage: transit_catalogue <make_base|process_requests>";

#[derive(Error, Debug)]
enum AppError {
    #[error("malformed input: {0}")]
    Parse(#[from] json::ParseError),
    #[error("malformed input: {0}")]
    Node(#[from] NodeError),
    #[error("{0}")]
    Dispatch(#[from] dispatch::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] snapshot::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();

    let mode = match env::args().nth(1) {
        Some(mode) => mode,
        None => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let result = match mode.as_str() {
        "make_base" => run_make_base(),
        "process_requests" => run_process_requests(),
        other => {
            eprintln!("unknown mode {other:?}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn read_stdin() -> Result<Node, AppError> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok(json::parse(&source)?)
}

fn run_make_base() -> Result<(), AppError> {
    let start = Instant::now();
    let document = read_stdin()?;

    let mut catalogue = Catalogue::new();
    let base_requests = document.get("base_requests")?.as_array()?;
    populate_catalogue(&mut catalogue, base_requests)?;
    info!(
        stops = catalogue.stops().len() as u64,
        buses = catalogue.buses().len() as u64,
        "catalogue populated in {:?}",
        start.elapsed()
    );

    let render_settings = parse_render_settings(document.get("render_settings")?)?;
    let routing_settings = parse_routing_settings(document.get("routing_settings")?)?;
    let serialization_settings = parse_serialization_settings(document.get("serialization_settings")?)?;

    let snapshot_start = Instant::now();
    let bytes = snapshot::encode(&catalogue, &render_settings, &routing_settings)?;
    fs::write(&serialization_settings.file, &bytes)?;
    info!(
        bytes = bytes.len() as u64,
        file = %serialization_settings.file,
        "snapshot written in {:?}",
        snapshot_start.elapsed()
    );
    Ok(())
}

fn run_process_requests() -> Result<(), AppError> {
    let document = read_stdin()?;

    let serialization_settings = parse_serialization_settings(document.get("serialization_settings")?)?;
    let load_start = Instant::now();
    let bytes = fs::read(&serialization_settings.file)?;
    let (catalogue, render_settings, routing_settings) = snapshot::decode(&bytes)?;
    info!(
        stops = catalogue.stops().len() as u64,
        buses = catalogue.buses().len() as u64,
        "snapshot loaded in {:?}",
        load_start.elapsed()
    );

    let router_start = Instant::now();
    let router = Router::build(&catalogue, &routing_settings);
    info!("routing graph built in {:?}", router_start.elapsed());

    let stat_requests = document.get("stat_requests")?.as_array()?;
    let responses: Vec<Node> = stat_requests
        .par_iter()
        .map(|request| dispatch(request, &catalogue, &render_settings, &router))
        .collect::<Result<Vec<Node>, dispatch::Error>>()?;

    let output = json::print(&Node::Array(responses));
    io::stdout().write_all(output.as_bytes())?;
    io::stdout().write_all(b"\n")?;
    Ok(())
}
