use anyhow::Context;
use clap::Parser;
use doc_verify::{cli, config, document, report, GeminiClient, VerificationController, VerifyError};
use cli::{Cli, Commands};
use config::Config;
use doc_verify_common::{ProgressSchedule, ProgressState};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn progress_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("█▓░"));
    bar
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load().context("failed to load config")?;

    match cli.command {
        Commands::Verify { file, output, json, no_progress_delay, model } => {
            if !json {
                println!("🪪 doc-verify - 書類検証\n");
            }

            let api_key = config.resolve_api_key().unwrap_or_default();
            let mut client = GeminiClient::from_config(&config, api_key)?;
            if let Some(model) = model {
                client = client.with_model(model);
            }
            log::info!("model: {}", client.model());
            let schedule = if no_progress_delay {
                ProgressSchedule::disabled()
            } else {
                ProgressSchedule::scripted()
            };
            let controller = VerificationController::new(client).with_schedule(schedule);

            let uploaded = match document::load_document(&file, config.max_file_size_bytes()).await {
                Ok(uploaded) => uploaded,
                Err(err) => {
                    eprintln!("{}", report::render_error(&err.to_failure_message()));
                    return Ok(ExitCode::FAILURE);
                }
            };

            let bar = progress_bar(json);
            let submitted = controller
                .submit(uploaded, |p: &ProgressState| {
                    bar.set_position(u64::from(p.percent));
                    bar.set_message(p.text.clone());
                })
                .await;
            bar.finish_and_clear();

            if let Err(err) = submitted {
                // 試行が始まらなかった（設定不足など）
                eprintln!("{}", report::render_error(&err.to_string()));
                if matches!(err, VerifyError::MissingApiKey) {
                    eprintln!("  `doc-verify config --set-api-key YOUR_KEY` でも設定できます");
                }
                let code = if err.is_precondition() { 2 } else { 1 };
                return Ok(ExitCode::from(code));
            }

            let state = controller.snapshot();
            let today = chrono::Local::now().date_naive();
            let Some(result) = state.result.as_ref() else {
                let banner = report::render_state(&state, today).unwrap_or_else(|| {
                    report::render_error(&VerifyError::Unknown.to_failure_message())
                });
                eprintln!("{}", banner);
                return Ok(ExitCode::FAILURE);
            };

            if json {
                println!("{}", report::to_json(result)?);
            } else if let Some(panel) = report::render_state(&state, today) {
                println!("{}", panel);
            }

            if let Some(output) = output {
                report::write_json(result, &output)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                if !json {
                    println!("✔ 結果を保存: {}", output.display());
                }
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  タイムアウト: {}", match config.timeout() {
                    Some(t) => format!("{}秒", t.as_secs()),
                    None => "なし".to_string(),
                });
                println!("  最大ファイルサイズ: {}MB", config.max_file_size_mb);
                println!(
                    "  APIキー: {}",
                    if config.resolve_api_key().is_some() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
