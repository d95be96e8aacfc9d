//! CLI for imgedit - prompt-driven image editing.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use imgedit::session::{Intent, SessionController};
use imgedit::view::{self, LineCommand, PromptDraft};
use imgedit::{GeminiClient, GeminiModel};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imgedit")]
#[command(about = "Edit images with natural-language prompts via Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit one image and save the result
    Edit(EditArgs),

    /// Start an interactive editing session
    Session(SessionArgs),
}

#[derive(Args)]
struct ClientArgs {
    /// Model to use
    #[arg(short, long, value_enum, default_value = "flash")]
    model: ModelArg,

    /// Give up on a request after this many seconds (no limit by default)
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Args)]
struct EditArgs {
    /// The editing instruction
    prompt: String,

    /// Image to edit
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the edited image
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    client: ClientArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SessionArgs {
    /// Image to start with
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[command(flatten)]
    client: ClientArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Flash,
    Pro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Flash => GeminiModel::FlashImage,
            ModelArg::Pro => GeminiModel::ProImage,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Edit(args) => edit_image(args).await?,
        Commands::Session(args) => run_session(args).await?,
    }

    Ok(())
}

fn build_client(args: &ClientArgs) -> anyhow::Result<GeminiClient> {
    let mut builder = GeminiClient::builder().model(args.model.into());
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Reads the next line unless `interrupt` fires first, which reads as end of input.
async fn next_line_or_interrupt<R, F>(
    lines: &mut Lines<R>,
    interrupt: F,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => Ok(None),
        line = lines.next_line() => line,
    }
}

async fn edit_image(args: EditArgs) -> anyhow::Result<()> {
    let client = build_client(&args.client)?;
    let model = client.model();
    let mut session = SessionController::new(client);

    session.upload_image(&args.input).await;
    if let Some(message) = session.state().last_error() {
        anyhow::bail!("{message} ({})", args.input.display());
    }

    session.edit_prompt(&args.prompt);
    session.submit_or_cancel(ctrl_c()).await;
    if let Some(message) = session.state().last_error() {
        anyhow::bail!("{message}");
    }

    let result = session
        .state()
        .result()
        .context("no image was returned")?;
    result.save(&args.output)?;
    let size = result.to_bytes()?.len();

    if args.json {
        let output = serde_json::json!({
            "type": "image",
            "success": true,
            "input": args.input.display().to_string(),
            "output": args.output.display().to_string(),
            "size_bytes": size,
            "mime_type": result.mime_type(),
            "model": model.as_str(),
            "label": result.alt,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Edited image: {} ({} bytes) via {}",
            args.output.display(),
            size,
            model.as_str()
        );
    }

    Ok(())
}

async fn run_session(args: SessionArgs) -> anyhow::Result<()> {
    let client = build_client(&args.client)?;
    let mut session = SessionController::new(client);

    println!("{}\n{}\n\n{}\n", view::TITLE, view::SUBTITLE, view::INTRO);
    println!("{}\n", view::HELP);

    if let Some(path) = args.input {
        session.dispatch(Intent::Upload(path)).await;
    }
    print!("{}", view::render(session.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = PromptDraft::default();

    while let Some(line) = next_line_or_interrupt(&mut lines, ctrl_c()).await? {
        match view::parse_line(&line) {
            LineCommand::Quit => break,
            LineCommand::Help => {
                println!("{}", view::HELP);
                continue;
            }
            LineCommand::Show => {}
            LineCommand::Invalid(message) => {
                eprintln!("{message}");
                continue;
            }
            LineCommand::Open(path) | LineCommand::Drop(path) => {
                session.dispatch(Intent::Upload(path)).await;
            }
            LineCommand::Save(path) => {
                match session.state().result() {
                    Some(result) => match result.save(&path) {
                        Ok(()) => println!("Saved {}", path.display()),
                        Err(e) => eprintln!("Could not save {}: {e}", path.display()),
                    },
                    None => eprintln!("Nothing to save yet."),
                }
                continue;
            }
            LineCommand::Prompt { text, submit } => {
                for intent in draft.feed(&text, submit) {
                    if intent != Intent::Submit {
                        session.dispatch(intent).await;
                        continue;
                    }
                    if session.state().source().is_some() && session.can_submit() {
                        println!("{}", view::BUSY_TEXT);
                    }
                    session.submit_or_cancel(ctrl_c()).await;
                }
                if draft.is_pending() {
                    continue;
                }
            }
        }
        print!("{}", view::render(session.state()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interrupt_ends_input_at_idle_prompt() {
        let mut lines = BufReader::new(&b"add a hat\n"[..]).lines();
        let line = next_line_or_interrupt(&mut lines, async {}).await.unwrap();
        assert_eq!(line, None);
    }

    #[tokio::test]
    async fn test_line_read_without_interrupt() {
        let mut lines = BufReader::new(&b"add a hat\n"[..]).lines();
        let line = next_line_or_interrupt(&mut lines, std::future::pending())
            .await
            .unwrap();
        assert_eq!(line.as_deref(), Some("add a hat"));

        let line = next_line_or_interrupt(&mut lines, std::future::pending())
            .await
            .unwrap();
        assert_eq!(line, None);
    }
}
