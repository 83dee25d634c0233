use std::io::Write;

use feedback_view::detail::{DetailController, DetailState};

use crate::output::line;
use crate::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ParsedArgs {
    id: String,
    copy: bool,
}

pub(crate) async fn execute(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    let parsed = parse_args(args)?;

    // Only the instance is needed here; skip the feedback fetch `open` does.
    let mut detail = DetailController::new(ctx.config.clone());
    let ticket = detail.begin(&parsed.id);
    let result = ctx.api.get_instance(&parsed.id).await;
    detail.resolve(ticket, result);
    if let DetailState::Error(message) = detail.state() {
        return Err(message.clone());
    }

    let url = if parsed.copy {
        match detail.copy_submission_url(ctx.clipboard) {
            Some(url) => url,
            None => {
                return Err(detail
                    .notice()
                    .map(|notice| notice.text.clone())
                    .unwrap_or_else(|| "error: nothing to copy".to_string()));
            }
        }
    } else {
        detail
            .submission_url()
            .ok_or_else(|| format!("error: instance '{}' did not resolve", parsed.id))?
    };

    line(stdout, &url)?;
    if let Some(notice) = detail.notice().filter(|notice| !notice.is_error()) {
        line(stdout, &notice.text)?;
    }
    detail.leave();
    Ok(())
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    for token in args {
        match token.as_str() {
            "-h" | "--help" | "help" => return Err(HELP_TEXT.to_string()),
            "--copy" => parsed.copy = true,
            flag if flag.starts_with('-') => {
                return Err(format!("error: unknown argument for url: '{flag}'"));
            }
            value => {
                if !parsed.id.is_empty() {
                    return Err("error: accepts at most 1 argument".to_string());
                }
                parsed.id = value.to_string();
            }
        }
    }
    if parsed.id.trim().is_empty() {
        return Err("error: instance ID required".to_string());
    }
    Ok(parsed)
}

const HELP_TEXT: &str = "\
Print the public URL end users submit feedback to

Usage:
  feedback-cli url <id> [flags]

Flags:
      --copy   also place the URL on the terminal clipboard (OSC 52)
  -h, --help   help for url";
