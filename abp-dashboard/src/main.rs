//! # abp-dashboard
//!
//! Collects a PPG/ECG window, asks the inference service for an ABP estimate,
//! draws the result in the terminal and saves it as JSON.

mod chart;
mod client;
mod error;
mod input;
mod locale;

use clap::Parser;
use client::PredictClient;
use error::DashboardError;
use input::SignalPair;
use locale::Locale;
use ratatui::{prelude::*, TerminalOptions, Viewport};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "abp-dashboard")]
#[command(about = "Estimate arterial blood pressure from PPG and ECG signals", long_about = None)]
struct Cli {
    /// Prediction endpoint of the inference service
    #[arg(long, env = "ABP_SERVICE_URL", default_value = "http://127.0.0.1:5000/predict")]
    url: String,

    /// PPG signal as comma-separated values
    #[arg(long)]
    ppg: Option<String>,

    /// ECG signal as comma-separated values
    #[arg(long)]
    ecg: Option<String>,

    /// JSON file with `ppg` and `ecg` arrays (takes precedence over --ppg/--ecg)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to save the prediction
    #[arg(short, long, default_value = "predicted_abp_result.json")]
    output: PathBuf,

    /// Language for operator messages
    #[arg(long, value_enum, default_value_t = Locale::En)]
    lang: Locale,

    /// Chart height in terminal rows
    #[arg(long, default_value = "20")]
    height: u16,
}

#[derive(Debug, PartialEq)]
enum Outcome {
    /// The service answered but returned no samples.
    Empty,
    Saved { path: PathBuf, samples: usize },
}

fn load_pair(cli: &Cli) -> Result<SignalPair, DashboardError> {
    if let Some(path) = &cli.input {
        return SignalPair::from_file(path);
    }
    match (&cli.ppg, &cli.ecg) {
        (Some(ppg), Some(ecg)) => SignalPair::from_csv(ppg, ecg),
        _ => Err(DashboardError::NoInput),
    }
}

/// One prediction round: gather, validate, request, render, save.
///
/// Chart failures are reported on `out` and do not stop the result from being saved.
fn run<B, W, F>(cli: &Cli, out: &mut W, make_terminal: F) -> Result<Outcome, DashboardError>
where
    B: Backend,
    W: Write,
    F: FnOnce() -> io::Result<Terminal<B>>,
{
    let locale = cli.lang;
    let pair = load_pair(cli)?;
    pair.validate()?;

    let response = PredictClient::new(cli.url.as_str())?.predict(&pair)?;
    writeln!(out, "{} {}", locale.raw_output(), response)?;

    let row = client::first_row(&response)?;
    if row.is_empty() {
        writeln!(out, "{}", locale.empty_result())?;
        return Ok(Outcome::Empty);
    }
    writeln!(out, "{}", locale.success())?;

    let rendered = make_terminal().and_then(|mut terminal| chart::draw(&mut terminal, &row, locale));
    if let Err(e) = rendered {
        tracing::warn!(error = %e, "chart rendering failed");
        writeln!(out, "{}: {}", locale.render_failed(), e)?;
    }

    client::save_result(&cli.output, &row)?;
    writeln!(out, "{}", locale.saved(&cli.output))?;

    Ok(Outcome::Saved {
        path: cli.output.clone(),
        samples: row.len(),
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abp_dashboard=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let height = cli.height;
    let mut stdout = io::stdout();
    let result = run(&cli, &mut stdout, || {
        Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )
    });

    match result {
        Ok(Outcome::Saved { path, samples }) => {
            tracing::info!(path = %path.display(), samples, "prediction saved");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Empty) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "prediction failed");
            eprintln!("{}", cli.lang.describe(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use ratatui::backend::TestBackend;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::tempdir;

    /// Serves a fixed response on `/predict` from a background thread.
    fn spawn_stub(status: StatusCode, body: Value) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new().route(
                    "/predict",
                    post(move || {
                        let body = body.clone();
                        async move { (status, Json(body)) }
                    }),
                );
                axum::serve(listener, app).await.unwrap();
            });
        });

        format!("http://{}/predict", addr)
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("abp-dashboard").chain(args.iter().copied())).unwrap()
    }

    fn test_terminal() -> io::Result<Terminal<TestBackend>> {
        Terminal::new(TestBackend::new(80, 20))
    }

    #[test]
    fn test_uploaded_file_is_rendered_and_saved() {
        let row: Vec<f64> = (0..250).map(|i| 90.0 + (i % 25) as f64).collect();
        let url = spawn_stub(StatusCode::OK, json!({ "predicted_abp": [row.clone()] }));

        let dir = tempdir().unwrap();
        let input = dir.path().join("signals.json");
        let output = dir.path().join("predicted_abp_result.json");
        fs::write(
            &input,
            json!({ "ppg": vec![0.1; 250], "ecg": vec![0.2; 250] }).to_string(),
        )
        .unwrap();

        let cli = cli(&[
            "--url",
            &url,
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        let mut out = Vec::new();
        let outcome = run(&cli, &mut out, test_terminal).unwrap();

        assert_eq!(
            outcome,
            Outcome::Saved {
                path: output.clone(),
                samples: 250
            }
        );
        let saved: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(saved, json!({ "predicted_abp": [row] }));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Raw model output:"));
        assert!(printed.contains("Prediction succeeded!"));
    }

    #[test]
    fn test_short_signal_is_rejected_locally() {
        let ppg = vec!["1"; 249].join(",");
        let ecg = vec!["1"; 250].join(",");
        // No server is listening; validation must fail before any request.
        let cli = cli(&["--url", "http://127.0.0.1:9/predict", "--ppg", &ppg, "--ecg", &ecg]);

        let result = run(&cli, &mut Vec::new(), test_terminal);
        assert!(matches!(
            result,
            Err(DashboardError::Length {
                ppg: 249,
                ecg: 250,
                ..
            })
        ));
    }

    #[test]
    fn test_service_error_is_surfaced() {
        let url = spawn_stub(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Missing required field(s): ecg" }),
        );
        let values = vec!["0"; 250].join(",");
        let cli = cli(&["--url", &url, "--ppg", &values, "--ecg", &values]);

        match run(&cli, &mut Vec::new(), test_terminal) {
            Err(DashboardError::Service(message)) => {
                assert_eq!(message, "Missing required field(s): ecg");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_prediction_is_not_saved() {
        let url = spawn_stub(StatusCode::OK, json!({ "predicted_abp": [[]] }));
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.json");
        let values = vec!["0"; 250].join(",");
        let cli = cli(&[
            "--url",
            &url,
            "--ppg",
            &values,
            "--ecg",
            &values,
            "--output",
            output.to_str().unwrap(),
        ]);

        let outcome = run(&cli, &mut Vec::new(), test_terminal).unwrap();
        assert_eq!(outcome, Outcome::Empty);
        assert!(!output.exists());
    }

    #[test]
    fn test_render_failure_still_saves() {
        let url = spawn_stub(StatusCode::OK, json!({ "predicted_abp": [[120.0]] }));
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.json");
        let values = vec!["0"; 250].join(",");
        let cli = cli(&[
            "--url",
            &url,
            "--ppg",
            &values,
            "--ecg",
            &values,
            "--output",
            output.to_str().unwrap(),
        ]);

        let mut out = Vec::new();
        let outcome = run(&cli, &mut out, || -> io::Result<Terminal<TestBackend>> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "not a terminal"))
        })
        .unwrap();

        assert!(matches!(outcome, Outcome::Saved { samples: 1, .. }));
        assert!(String::from_utf8(out).unwrap().contains("not a terminal"));
    }

    #[test]
    fn test_missing_input() {
        let cli = cli(&["--ppg", "1,2"]);
        assert!(matches!(load_pair(&cli), Err(DashboardError::NoInput)));
    }
}
