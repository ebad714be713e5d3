//! A simple program demonstrates how to use `deskhand` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use deskhand::{Desk, DeskBuilder};
use deskhand_rest_provider::{RestConfigBuilder, RestProvider};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tokio::io::{self, AsyncBufReadExt};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(base_url) = env::var("DESKHAND_BASE_URL") else {
        eprintln!("DESKHAND_BASE_URL environment variable is not set");
        return;
    };
    let mut config = RestConfigBuilder::with_base_url(base_url);
    if let Ok(token) = env::var("DESKHAND_API_TOKEN") {
        config = config.with_bearer_token(token);
    }
    let provider = RestProvider::new(config.build());
    let desk = DeskBuilder::with_provider(provider).build();

    print_help(&desk);

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        if line == "help" {
            print_help(&desk);
            continue;
        }

        let (name, arguments) = match parse_invocation(line) {
            Ok(invocation) => invocation,
            Err(reason) => {
                println!("{}", reason.bright_red());
                continue;
            }
        };

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message(format!("Calling {name}..."));
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let result = desk.call(&name, arguments).await;
        progress_bar.finish_and_clear();
        print_result(&result);
    }
}

/// Splits a line like `resolve_reference {"kind": "document", ...}` into
/// the operation name and its JSON arguments.
fn parse_invocation(line: &str) -> Result<(String, Value), String> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_owned();
    let rest = parts.next().unwrap_or("").trim();
    if rest.is_empty() {
        return Ok((name, json!({})));
    }
    serde_json::from_str(rest)
        .map(|arguments| (name, arguments))
        .map_err(|err| format!("arguments are not valid JSON: {err}"))
}

fn print_result(result: &Value) {
    let succeeded = result["status"] == "success";
    let rendered = serde_json::to_string_pretty(result).unwrap_or_default();
    for line in rendered.lines() {
        if succeeded {
            println!("{}{line}", BAR_CHAR.bright_green());
        } else {
            println!("{}{line}", BAR_CHAR.bright_red());
        }
    }
}

fn print_help(desk: &Desk) {
    println!("{}", "Available operations:".bright_white().bold());
    for definition in desk.definitions() {
        let summary = definition
            .description
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .trim();
        println!("  {} — {summary}", definition.name.bright_cyan());
    }
    println!("Call one with: <operation> {{\"arg\": \"value\", ...}}");
    println!();
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
