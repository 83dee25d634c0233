use std::io::Write;

use serde::Serialize;

use feedback_core::models::Instance;
use feedback_view::list::InstanceListController;

use crate::output::{line, write_json};
use crate::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ParsedArgs {
    json: bool,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateResult<'a> {
    instance: &'a Instance,
    submission_url: String,
}

pub(crate) async fn execute(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    let parsed = parse_args(args)?;

    let mut list = InstanceListController::new();
    list.open_create_dialog();
    list.set_name(parsed.name.unwrap_or_default());
    if !list.can_submit() {
        return Err("error: instance name is required".to_string());
    }

    let instance = match list.submit_create(ctx.api).await {
        Ok(instance) => instance,
        Err(err) => {
            return Err(list
                .notice()
                .map(|notice| notice.text.clone())
                .unwrap_or_else(|| err.to_string()));
        }
    };
    let submission_url = ctx.config.submission_url(&instance.key);

    if parsed.json {
        return write_json(
            stdout,
            &CreateResult {
                instance: &instance,
                submission_url,
            },
        );
    }

    line(stdout, format!("Created instance \"{}\"", instance.name))?;
    line(stdout, format!("ID:             {}", instance.id))?;
    line(stdout, format!("Key:            {}", instance.key))?;
    line(stdout, format!("Submission URL: {submission_url}"))
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    for token in args {
        match token.as_str() {
            "-h" | "--help" | "help" => return Err(HELP_TEXT.to_string()),
            "--json" => parsed.json = true,
            flag if flag.starts_with('-') => {
                return Err(format!("error: unknown argument for create: '{flag}'"));
            }
            value => {
                if parsed.name.is_some() {
                    return Err(
                        "error: accepts at most 1 argument (quote names containing spaces)"
                            .to_string(),
                    );
                }
                parsed.name = Some(value.to_string());
            }
        }
    }
    Ok(parsed)
}

const HELP_TEXT: &str = "\
Create a feedback instance

Usage:
  feedback-cli create <name> [flags]

Flags:
  -h, --help   help for create
      --json   output JSON";
