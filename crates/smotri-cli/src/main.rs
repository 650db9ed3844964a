use std::{
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use smotri_core::{
    ChatComplete, ChatConfig, GeminiClient, GroqClient, SessionController, SubmitOutcome,
    Summarize, SummarizerConfig, VideoIdentity, chat_api_key, format_transcript,
    is_supported_container, summarizer_api_key, summary_file_name,
};

#[derive(Parser)]
#[command(name = "smotri")]
#[command(
    about = "Summarize a short video with a multimodal model and chat about its content"
)]
struct Cli {
    /// Video file (mp4 or mov; keep it under ~2 minutes)
    video: PathBuf,

    /// Seconds between remote processing status checks
    #[arg(long, default_value_t = 10)]
    poll_interval: u64,

    /// Maximum status checks before giving up on remote processing
    #[arg(long, default_value_t = 60)]
    max_polls: u32,

    /// Directory to write video_summary.txt into after analysis
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stage a video into the session and print the resulting summary.
async fn submit<S: Summarize, C: ChatComplete>(
    ctl: &mut SessionController<S, C>,
    path: &Path,
) -> Result<()> {
    if !is_supported_container(path) {
        bail!("{}: only mp4 and mov files are accepted", path.display());
    }

    let canonical = path
        .canonicalize()
        .with_context(|| format!("cannot read {}", path.display()))?;
    let bytes = tokio::fs::read(&canonical)
        .await
        .with_context(|| format!("cannot read {}", canonical.display()))?;
    let identity = VideoIdentity::new(canonical.to_string_lossy().into_owned());

    let spinner = create_spinner("Analyzing and summarizing the video...");
    let outcome = ctl.submit_video(identity, &bytes).await?;
    match outcome {
        SubmitOutcome::Unchanged => {
            spinner.finish_with_message(format!(
                "{} Already analyzed {}",
                style("✓").green().bold(),
                style("(same video)").dim()
            ));
            return Ok(());
        }
        SubmitOutcome::Summarized => {
            spinner.finish_with_message(format!(
                "{} Video analysis complete",
                style("✓").green().bold()
            ));
        }
    }

    let summary = ctl.session().summary().expect("summary stored on submit");
    if summary.is_failed() {
        println!(
            "\n{} {}\n",
            style("Summarization failed:").red().bold(),
            summary.text()
        );
        println!(
            "{}",
            style("You can still ask questions; the error text stands in for the summary.").dim()
        );
    } else {
        println!("\n{}\n", style("Video Summary").cyan().bold());
        println!("{}", summary.text());
    }
    Ok(())
}

async fn save_summary<S: Summarize, C: ChatComplete>(
    ctl: &SessionController<S, C>,
    dir: &Path,
) -> Result<()> {
    let Some(text) = ctl.summary_text() else {
        bail!("no summary to save yet");
    };
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(summary_file_name());
    tokio::fs::write(&path, text).await?;
    println!(
        "{} {}",
        style("Saved:").dim(),
        style(path.display()).cyan()
    );
    Ok(())
}

fn print_chat_help() {
    println!(
        "{}",
        style(
            "Ask a question about the video summary, or use:\n  /load <path>  analyze a different video\n  /save         write video_summary.txt\n  /history      show the conversation so far\n  /clear        withdraw the video and reset\n  /quit         exit"
        )
        .dim()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Both credentials are a startup requirement, not a per-call concern.
    for key in [summarizer_api_key(), chat_api_key()] {
        if let Err(e) = key {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }

    let summarizer_config = SummarizerConfig {
        poll_interval: Duration::from_secs(cli.poll_interval),
        max_polls: cli.max_polls,
        ..SummarizerConfig::default()
    };
    let summarizer = GeminiClient::from_env(summarizer_config)?;
    let chat = GroqClient::from_env(ChatConfig::default())?;
    let mut ctl = SessionController::new(summarizer, chat);

    println!(
        "\n{}  {}\n",
        style("smotri").cyan().bold(),
        style("Video Understanding Chat").dim()
    );
    println!(
        "{}",
        style("Upload guidance: maximum video duration is 2 minutes.").dim()
    );

    submit(&mut ctl, &cli.video).await?;

    if let Some(dir) = &cli.output {
        save_summary(&ctl, dir).await?;
    }

    print_chat_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            ("/quit", _) | ("/exit", _) => break,
            ("/load", "") => println!("{}", style("Usage: /load <path>").dim()),
            ("/load", path) => {
                if let Err(e) = submit(&mut ctl, Path::new(path)).await {
                    eprintln!("{} {:#}", style("Error:").red().bold(), e);
                }
            }
            ("/save", _) => {
                let dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));
                if let Err(e) = save_summary(&ctl, &dir).await {
                    eprintln!("{} {:#}", style("Error:").red().bold(), e);
                }
            }
            ("/history", _) => {
                let transcript = ctl.session().transcript();
                if transcript.is_empty() {
                    println!("{}", style("No conversation yet.").dim());
                } else {
                    println!("{}", format_transcript(transcript));
                }
            }
            ("/clear", _) => {
                ctl.clear();
                println!(
                    "{}",
                    style("Session cleared. Use /load <path> to analyze a video.").dim()
                );
            }
            _ => {
                let spinner = create_spinner("Thinking...");
                match ctl.ask(line).await {
                    Ok(answer) => {
                        spinner.finish_and_clear();
                        println!("{} {}", style("assistant:").green().bold(), answer);
                    }
                    Err(e) => {
                        spinner.finish_and_clear();
                        eprintln!("{} {}", style("Error:").red().bold(), e);
                    }
                }
            }
        }
    }

    Ok(())
}
