use std::io::Write;

use feedback_view::detail::{DeleteOutcome, DetailController, DetailState};
use feedback_view::store::InstanceStore;

use crate::output::line;
use crate::CommandContext;

pub(crate) async fn execute(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    let id = parse_args(args)?;

    let mut detail = DetailController::new(ctx.config.clone());
    if let DetailState::Error(message) = detail.open(ctx.api, &id, None).await {
        return Err(message.clone());
    }
    let Some(instance) = detail.instance().cloned() else {
        return Err(format!("error: instance '{id}' did not resolve"));
    };

    if !detail.request_delete() {
        return Err(format!("error: instance '{id}' cannot be deleted right now"));
    }
    write!(
        stdout,
        "Delete \"{}\" ({}) and all {} of its feedback? This cannot be undone. [y/N]: ",
        instance.name,
        instance.key,
        detail.feedback().items().len()
    )
    .map_err(|err| err.to_string())?;
    stdout.flush().map_err(|err| err.to_string())?;

    let mut answer = String::new();
    ctx.stdin
        .read_line(&mut answer)
        .map_err(|err| format!("error: read confirmation: {err}"))?;
    line(stdout, "")?;

    if !is_yes(&answer) {
        detail.cancel_delete();
        return line(stdout, "Delete cancelled.");
    }

    let mut store = InstanceStore::with_instances(vec![instance.clone()]);
    match detail.confirm_delete(ctx.api, &mut store).await {
        DeleteOutcome::NavigateToList => line(stdout, format!("Deleted \"{}\".", instance.name)),
        DeleteOutcome::Failed(message) => Err(message),
        DeleteOutcome::NotConfirmed => Err("error: delete was not confirmed".to_string()),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn parse_args(args: &[String]) -> Result<String, String> {
    let mut id: Option<String> = None;
    for token in args {
        match token.as_str() {
            "-h" | "--help" | "help" => return Err(HELP_TEXT.to_string()),
            flag if flag.starts_with('-') => {
                return Err(format!("error: unknown argument for delete: '{flag}'"));
            }
            value => {
                if id.is_some() {
                    return Err("error: accepts at most 1 argument".to_string());
                }
                id = Some(value.to_string());
            }
        }
    }
    id.filter(|value| !value.trim().is_empty())
        .ok_or_else(|| "error: instance ID required".to_string())
}

const HELP_TEXT: &str = "\
Delete an instance and all of its feedback

Asks for confirmation on stdin before anything is sent.

Usage:
  feedback-cli delete <id>

Flags:
  -h, --help   help for delete";
