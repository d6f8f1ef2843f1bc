use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use thiserror::Error;

/// Exit codes: 2 = input error, 3 = rejected by the gate (400), 1 = other.
pub const EXIT_OTHER: i32 = 1;
pub const EXIT_INPUT: i32 = 2;
pub const EXIT_REJECTED: i32 = 3;

#[derive(Error, Debug)]
pub enum CliError {
    /// Bad local input: unreadable file, missing argument, unwritable output.
    #[error("{0}")]
    Input(String),

    #[error("HTTP 400: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) => EXIT_INPUT,
            CliError::Rejected(_) => EXIT_REJECTED,
            CliError::Other(_) => EXIT_OTHER,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub struct Client {
    base: String,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base, path);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| CliError::Other(format!("request failed: {e}")))?;
        body_or_error(resp)
    }

    fn post_text(&self, path: &str, query: &[(&str, String)], body: String) -> Result<String> {
        let url = format!("{}{}", self.base, path);
        let resp = self
            .http
            .post(&url)
            .query(query)
            .header("content-type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .map_err(|e| CliError::Other(format!("request failed: {e}")))?;
        body_or_error(resp)
    }
}

/// Successful body as text; a 400 is the gate rejecting the request.
fn body_or_error(resp: reqwest::blocking::Response) -> Result<String> {
    let status = resp.status();
    let text = resp
        .text()
        .map_err(|e| CliError::Other(format!("response body: {e}")))?;
    match status.as_u16() {
        _ if status.is_success() => Ok(text),
        400 => Err(CliError::Rejected(text.trim().to_string())),
        code => Err(CliError::Other(format!("HTTP {code}: {}", text.trim()))),
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::Input(format!("read stdin: {e}")))?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(|e| CliError::Input(format!("read file: {e}")))
    }
}

/// Query pairs with unset values left out.
fn query(pairs: &[(&'static str, Option<String>)]) -> Vec<(&'static str, String)> {
    pairs
        .iter()
        .filter_map(|(k, v)| v.clone().map(|v| (*k, v)))
        .collect()
}

// ── render ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Rendered {
    js: String,
    css: String,
    controls: Value,
}

pub fn render(
    client: &Client,
    spec: &str,
    data: &str,
    width: i32,
    height: i32,
    visid: Option<&str>,
    raw: bool,
) -> Result<()> {
    let csv = read_input(data)?;
    let q = query(&[
        ("src", Some(spec.to_string())),
        ("width", Some(width.to_string())),
        ("height", Some(height.to_string())),
        ("visid", visid.map(String::from)),
    ]);
    let body = client.post_text("/interpret/d3", &q, csv)?;
    if raw {
        println!("{body}");
        return Ok(());
    }

    let out: Rendered = serde_json::from_str(&body).map_err(|e| CliError::Other(format!("parse response: {e}")))?;
    println!("{}", "// script".dimmed());
    println!("{}", out.js);
    if !out.css.is_empty() {
        println!("{}", "/* style */".dimmed());
        println!("{}", out.css);
    }
    let filters = out
        .controls
        .get("filters")
        .and_then(|f| f.as_array())
        .map(|f| f.len())
        .unwrap_or(0);
    println!("{} {}", "Controls:".dimmed(), format!("{filters} filter(s)").cyan());
    Ok(())
}

// ── page ────────────────────────────────────────────────────────

pub struct PageArgs {
    pub src: Option<String>,
    pub url: Option<String>,
    pub data: Option<String>,
    pub width: i32,
    pub height: i32,
    pub files: Option<String>,
}

pub fn page(client: &Client, args: PageArgs, out: Option<&str>) -> Result<()> {
    if args.src.is_none() && args.url.is_none() {
        return Err(CliError::Input("missing spec: pass --src or --url".into()));
    }
    let q = query(&[
        ("brunel_src", args.src),
        ("brunel_url", args.url),
        ("data", args.data),
        ("width", Some(args.width.to_string())),
        ("height", Some(args.height.to_string())),
        ("files", args.files),
    ]);
    let html = client.get("/interpret/d3", &q)?;
    match out {
        Some(path) => {
            fs::write(path, &html).map_err(|e| CliError::Input(format!("write {path}: {e}")))?;
            println!("{} {}", "Wrote".green(), path.cyan());
        }
        None => print!("{html}"),
    }
    Ok(())
}

// ── match ───────────────────────────────────────────────────────

pub fn match_spec(
    client: &Client,
    spec: &str,
    new_data: &str,
    original_data: Option<&str>,
) -> Result<()> {
    let q = query(&[
        ("original_data", original_data.map(String::from)),
        ("new_data", Some(new_data.to_string())),
        ("src", Some(spec.to_string())),
    ]);
    let retargeted = client.get("/interpret/match", &q)?;
    println!("{retargeted}");
    Ok(())
}

// ── health ──────────────────────────────────────────────────────

pub fn health(client: &Client) -> Result<()> {
    let body = client.get("/healthz", &[])?;
    let json: Value = serde_json::from_str(&body).map_err(|e| CliError::Other(format!("parse: {e}")))?;
    if json.get("ok").and_then(|v| v.as_bool()) == Some(true) {
        println!("{} {}", "●".green(), "ok".green().bold());
    } else {
        println!("{} unexpected health response: {}", "●".yellow(), body);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_drops_unset_values() {
        let q = query(&[
            ("src", Some("x(a)".into())),
            ("visid", None),
            ("width", Some("0".into())),
        ]);
        assert_eq!(q, vec![("src", "x(a)".to_string()), ("width", "0".to_string())]);
    }

    #[test]
    fn read_input_reports_missing_file() {
        let err = read_input("/no/such/file.csv").unwrap_err();
        assert!(matches!(&err, CliError::Input(m) if m.starts_with("read file: ")));
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn page_needs_a_spec() {
        let client = Client::new("http://127.0.0.1:9");
        let args = PageArgs {
            src: None,
            url: None,
            data: None,
            width: 0,
            height: 0,
            files: None,
        };
        let err = page(&client, args, None).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn exit_codes_follow_the_error_kind() {
        let rejected = CliError::Rejected("Could not execute spec: x(: boom".into());
        assert_eq!(rejected.exit_code(), EXIT_REJECTED);
        assert_eq!(rejected.to_string(), "HTTP 400: Could not execute spec: x(: boom");
        // a failed body read is a transport problem, not bad input
        assert_eq!(CliError::Other("response body: reset".into()).exit_code(), EXIT_OTHER);
        assert_eq!(CliError::Other("HTTP 500: boom".into()).exit_code(), EXIT_OTHER);
    }

    #[test]
    fn unreachable_gate_is_other() {
        let client = Client::new("http://127.0.0.1:9");
        let err = health(&client).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_OTHER);
    }
}
