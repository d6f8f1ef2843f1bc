use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;

#[derive(Parser)]
#[command(name = "vizx", version, about = "Render, page and retarget visualizations through the viz gate")]
struct Cli {
    /// Gate server URL
    #[arg(long, env = "VIZ_GATE_URL", default_value = "http://localhost:3000")]
    gate: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a spec over a CSV file and print the script, style and controls
    Render {
        /// Visualization spec
        spec: String,
        /// Path to CSV file (or - for stdin)
        #[arg(default_value = "-")]
        data: String,
        #[arg(long, default_value_t = 0)]
        width: i32,
        #[arg(long, default_value_t = 0)]
        height: i32,
        /// Element id the script targets
        #[arg(long)]
        visid: Option<String>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Fetch a standalone HTML page
    Page {
        /// Inline spec
        #[arg(long, conflicts_with = "url")]
        src: Option<String>,
        /// URL the spec is read from
        #[arg(long)]
        url: Option<String>,
        /// Data URL
        #[arg(long)]
        data: Option<String>,
        #[arg(long, default_value_t = 0)]
        width: i32,
        #[arg(long, default_value_t = 0)]
        height: i32,
        /// Base URL of the page support assets
        #[arg(long)]
        files: Option<String>,
        /// Write the page to this file instead of stdout
        #[arg(long, short)]
        out: Option<String>,
    },
    /// Retarget a spec from one dataset onto another
    Match {
        /// Spec written for the original data
        spec: String,
        /// URL of the new data
        #[arg(long = "new")]
        new_data: String,
        /// URL of the original data (defaults to the spec's own data reference)
        #[arg(long = "original")]
        original_data: Option<String>,
    },
    /// Check gate server health
    Health,
}

fn main() {
    let cli = Cli::parse();
    let client = commands::Client::new(&cli.gate);

    let result = match cli.command {
        Commands::Render {
            spec,
            data,
            width,
            height,
            visid,
            json,
        } => commands::render(&client, &spec, &data, width, height, visid.as_deref(), json),
        Commands::Page {
            src,
            url,
            data,
            width,
            height,
            files,
            out,
        } => commands::page(
            &client,
            commands::PageArgs {
                src,
                url,
                data,
                width,
                height,
                files,
            },
            out.as_deref(),
        ),
        Commands::Match {
            spec,
            new_data,
            original_data,
        } => commands::match_spec(&client, &spec, &new_data, original_data.as_deref()),
        Commands::Health => commands::health(&client),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "vizx",
            "--gate",
            "http://gate:3000",
            "match",
            "bar x(a) y(b)",
            "--new",
            "file:///b.csv",
        ])
        .unwrap();
        assert_eq!(cli.gate, "http://gate:3000");
        assert!(matches!(
            cli.command,
            Commands::Match { original_data: None, .. }
        ));
    }

    #[test]
    fn page_src_and_url_conflict() {
        let res = Cli::try_parse_from(["vizx", "page", "--src", "x(a)", "--url", "file:///s"]);
        assert!(res.is_err());
    }
}
