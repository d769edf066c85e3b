use std::ops::Add;
use std::path::PathBuf;
use anyhow::anyhow;
use chrono::{Duration, Utc};
use structopt::StructOpt;
use tracing::{error, info};
use predictor_lib::{self, HistorySource, PredictionOptions, ReportFormat};

mod torch_model;
mod yahoo;

use torch_model::TorchModel;
use yahoo::service::YahooHistorySource;

#[derive(Debug, StructOpt)]
#[structopt(name = "stock-predictor", about = "Predicts the next closing price of a stock with a pre-trained network")]
struct Opt {
    /// TorchScript export of the trained network
    #[structopt(long, env = "PREDICTOR_MODEL_PATH", default_value = "model/lstm_stock_model.pt", parse(from_os_str))]
    model_path : PathBuf,

    /// Root url of the Yahoo Finance compatible chart API
    #[structopt(long, env = "PREDICTOR_HISTORY_URL", default_value = "https://query1.finance.yahoo.com")]
    history_url : String,

    #[structopt(long, env = "PREDICTOR_TIMEOUT_SECS", default_value = "30")]
    timeout_secs : u64,

    /// Calendar days of history requested before the prediction date
    #[structopt(long, env = "PREDICTOR_LOOKBACK_DAYS", default_value = "120")]
    lookback_days : u32,

    #[structopt(subcommand)]
    command : Command
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Predicts the closing price of a symbol on a date (YYYY-MM-DD)
    Predict {
        #[structopt(short, long)]
        symbol : String,
        #[structopt(short, long)]
        date : String,
        #[structopt(long, default_value = "text", possible_values = &["text", "json"])]
        format : ReportFormat
    },
    /// Checks that the model loads, history can be fetched and a prediction can be made
    Check {
        #[structopt(short, long, default_value = "AAPL")]
        symbol : String
    }
}

fn init_logging() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run_check(opt : &Opt, symbol : &str, options : &PredictionOptions) -> anyhow::Result<()> {
    let mut failed_stages = Vec::new();

    info!("Loading model from {}", opt.model_path.display());
    let mut model = match TorchModel::load(&opt.model_path) {
        Ok(model) => Some(model),
        Err(err) => { error!("Model loading failed: {:#}", err); failed_stages.push("model loading"); None }
    };

    let today = Utc::now().naive_utc().date();
    let mut source = match YahooHistorySource::create(&opt.history_url, std::time::Duration::from_secs(opt.timeout_secs)) {
        Ok(source) => Some(source),
        Err(err) => { error!("Data fetching failed: {:#}", err); failed_stages.push("data fetching"); None }
    };
    if let Some(source) = source.as_mut() {
        let since_date = today.checked_sub_signed(Duration::days(options.lookback_days as i64))
            .ok_or_else(|| anyhow!("Cannot look back {} days from {}", options.lookback_days, today));
        match since_date.and_then(|since_date| source.fetch_close_history(symbol, &since_date, &today.add(Duration::days(1)))) {
            Ok(history) if history.len() >= predictor_lib::WINDOW_SIZE =>
                info!("Fetched {} days of {} history", history.len(), symbol),
            Ok(history) => {
                error!("Only {} days of {} history available (need at least {})", history.len(), symbol, predictor_lib::WINDOW_SIZE);
                failed_stages.push("data fetching");
            },
            Err(err) => { error!("Data fetching failed: {:#}", err); failed_stages.push("data fetching"); }
        }
    }

    match (model.as_mut(), source.as_mut()) {
        (Some(model), Some(source)) => {
            let tomorrow = today.add(Duration::days(1)).format("%Y-%m-%d").to_string();
            match predictor_lib::predict_close(source, model, symbol, &tomorrow, options) {
                Ok(result) => info!("Prediction works:\n{}", predictor_lib::format_report(&result, ReportFormat::Text)?),
                Err(err) => { error!("Prediction failed: {}", err); failed_stages.push("prediction"); }
            }
        },
        _ => {
            error!("Prediction skipped, an earlier stage failed");
            failed_stages.push("prediction");
        }
    }

    if failed_stages.is_empty() {
        info!("All checks passed");
        Ok(())
    }
    else {
        Err(anyhow!("Failed checks: {}", failed_stages.join(", ")))
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let opt = Opt::from_args();
    let mut options = PredictionOptions::default();
    options.set_lookback_days(opt.lookback_days);

    match &opt.command {
        Command::Predict { symbol, date, format } => {
            let mut model = TorchModel::load(&opt.model_path)?;
            let mut source = YahooHistorySource::create(&opt.history_url, std::time::Duration::from_secs(opt.timeout_secs))?;

            match predictor_lib::render_prediction(&mut source, &mut model, symbol, date, &options, *format) {
                Ok(report) => {
                    println!("{}", report);
                    Ok(())
                },
                Err(error_text) => {
                    println!("{}", error_text);
                    std::process::exit(1);
                }
            }
        },
        Command::Check { symbol } => run_check(&opt, symbol, &options)
    }
}
