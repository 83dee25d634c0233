//! feedback-cli: terminal front end for the feedback dashboard.

use std::env;
use std::io::{BufRead, Write};
use std::sync::Arc;

use feedback_api::event::TracingEventSink;
use feedback_api::http::HttpFeedbackApi;
use feedback_api::service::FeedbackApi;
use feedback_core::config::ApiConfig;
use feedback_view::clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard};

pub mod create;
pub mod delete;
pub mod instances;
pub mod logging;
mod output;
pub mod show;
pub mod url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Everything a command needs besides its arguments and output streams.
pub struct CommandContext<'a> {
    pub api: &'a dyn FeedbackApi,
    pub config: &'a ApiConfig,
    pub clipboard: &'a dyn Clipboard,
    pub stdin: &'a mut dyn BufRead,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub api_url: Option<String>,
}

pub fn crate_label() -> &'static str {
    "feedback-cli"
}

pub fn run_from_env() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    logging::init();
    run_with_args(&args, &mut stdout, &mut stderr)
}

/// Resolve configuration, build the HTTP client and run one command.
pub fn run_with_args(args: &[String], stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32 {
    let (flags, index) = match parse_global_flags(args) {
        Ok(value) => value,
        Err(message) => {
            let _ = writeln!(stderr, "{message}");
            return 1;
        }
    };

    let mut config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            let _ = writeln!(stderr, "error: {message}");
            return 1;
        }
    };
    if let Some(url) = flags.api_url {
        config = config.with_base_url(url);
    }

    let api = match HttpFeedbackApi::new(config.clone(), Arc::new(TracingEventSink)) {
        Ok(api) => api,
        Err(err) => {
            let _ = writeln!(stderr, "error: {err}");
            return 1;
        }
    };
    let clipboard = Osc52Clipboard::new(std::io::stdout());
    let stdin = std::io::stdin();
    let mut stdin = stdin.lock();
    let mut ctx = CommandContext {
        api: &api,
        config: &config,
        clipboard: &clipboard,
        stdin: &mut stdin,
    };
    run_with_api(&args[index..], &mut ctx, stdout, stderr)
}

/// Run one command against an already-built backend on a current-thread
/// runtime. `args` starts at the command name.
pub fn run_with_api(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = writeln!(stderr, "error: start runtime: {err}");
            return 1;
        }
    };

    match runtime.block_on(dispatch(args, ctx, stdout)) {
        Ok(()) => 0,
        Err(message) => {
            let _ = writeln!(stderr, "{message}");
            1
        }
    }
}

/// Drive a command with an in-memory clipboard, stdin and output buffers.
pub fn run_for_test(args: &[&str], api: &dyn FeedbackApi, stdin: &str) -> CommandOutput {
    let config = ApiConfig::default();
    let clipboard = MemoryClipboard::new();
    run_for_test_with(args, api, &config, &clipboard, stdin)
}

pub fn run_for_test_with(
    args: &[&str],
    api: &dyn FeedbackApi,
    config: &ApiConfig,
    clipboard: &dyn Clipboard,
    stdin: &str,
) -> CommandOutput {
    let owned_args: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
    let mut input = stdin.as_bytes();
    let mut ctx = CommandContext {
        api,
        config,
        clipboard,
        stdin: &mut input,
    };
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = run_with_api(&owned_args, &mut ctx, &mut stdout, &mut stderr);
    CommandOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code,
    }
}

async fn dispatch(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    let command = args.first().map(|arg| arg.as_str());
    let rest = args.get(1..).unwrap_or_default();
    tracing::debug!(command = command.unwrap_or("help"), "dispatching command");
    match command {
        None | Some("help") | Some("-h") | Some("--help") => {
            write!(stdout, "{HELP_TEXT}").map_err(|err| err.to_string())
        }
        Some("instances") | Some("ls") => instances::execute(rest, ctx, stdout).await,
        Some("create") => create::execute(rest, ctx, stdout).await,
        Some("show") => show::execute(rest, ctx, stdout).await,
        Some("delete") | Some("rm") => delete::execute(rest, ctx, stdout).await,
        Some("url") => url::execute(rest, ctx, stdout).await,
        Some(other) => Err(format!(
            "error: unknown command '{other}' (run 'feedback-cli help')"
        )),
    }
}

/// Consume leading global flags; returns them with the index of the command.
pub fn parse_global_flags(args: &[String]) -> Result<(GlobalFlags, usize), String> {
    let mut flags = GlobalFlags::default();
    let mut index = 0usize;
    while let Some(token) = args.get(index) {
        match token.as_str() {
            "--api-url" => {
                let value = output::take_value(args, index, "--api-url")?;
                flags.api_url = Some(value);
                index += 2;
            }
            flag if flag.starts_with("--api-url=") => {
                flags.api_url = flag.strip_prefix("--api-url=").map(str::to_string);
                index += 1;
            }
            _ => break,
        }
    }
    if flags
        .api_url
        .as_deref()
        .is_some_and(|url| url.trim().is_empty())
    {
        return Err("error: --api-url must not be empty".to_string());
    }
    Ok((flags, index))
}

const HELP_TEXT: &str = "\
Manage feedback collection instances

Usage:
  feedback-cli [--api-url <url>] <command> [flags]

Commands:
  instances            list feedback instances
  create <name>        create a feedback instance
  show <id>            show an instance and its feedback
  delete <id>          delete an instance and its feedback
  url <id>             print the public submission URL

Global flags:
      --api-url string   backend base URL (overrides FEEDBACK_API_URL)

Environment:
  FEEDBACK_API_URL, FEEDBACK_SUBMISSION_URL, FEEDBACK_API_TIMEOUT_SECS, FEEDBACK_LOG
";
