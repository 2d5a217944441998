use clap::{Args, Parser, Subcommand};
use habitmath::api::{self, ServerConfig};
use habitmath::core::RawInput;

#[derive(Parser, Debug)]
#[command(
    name = "habitmath",
    about = "What-if calculators for coffee, smoking, lottery and other recurring spend"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API and the front-end bundle
    Serve(ServerConfig),
    /// Evaluate one calculator and print the result as JSON
    Eval(EvalArgs),
}

#[derive(Args, Debug)]
struct EvalArgs {
    #[arg(help = "Calculator slug or short name, e.g. coffee or how-much-lottery-costs")]
    calculator: String,
    #[arg(
        long = "field",
        value_parser = parse_field,
        help = "Form field as name=value; repeat for each field"
    )]
    fields: Vec<(String, String)>,
    #[arg(long, help = "Fixes the decorative fact for repeatable output")]
    fact_seed: Option<u64>,
    #[arg(long = "cancel", help = "Subscription line-item id to drop in the audit scenario")]
    cancelled: Vec<String>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Serve(config) => {
            if let Err(e) = api::run_http_server(config).await {
                log::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Eval(args) => {
            let fields: RawInput = args.fields.into_iter().collect();
            let request =
                match api::request_from_fields(&args.calculator, fields, args.fact_seed, args.cancelled) {
                    Ok(request) => request,
                    Err(e) => {
                        eprintln!("{e}");
                        std::process::exit(1);
                    }
                };
            match serde_json::to_string_pretty(&api::run_request(request)) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Failed to encode result: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
