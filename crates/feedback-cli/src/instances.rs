use std::io::Write;

use feedback_core::models::Instance;
use feedback_view::display::{format_instance_date, key_preview};
use feedback_view::list::InstanceListController;
use feedback_view::store::StoreState;
use tabwriter::TabWriter;

use crate::output::{line, write_json};
use crate::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ParsedArgs {
    json: bool,
}

pub(crate) async fn execute(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    let parsed = parse_args(args)?;

    let mut list = InstanceListController::new();
    if let StoreState::Error(message) = list.load(ctx.api).await {
        return Err(message.clone());
    }
    let instances = list.store().instances();

    if parsed.json {
        return write_json(stdout, instances);
    }

    if list.shows_empty_prompt() {
        line(stdout, "No feedback instances yet.")?;
        line(stdout, "")?;
        line(stdout, "How to collect feedback:")?;
        line(stdout, "  1. Create an instance:  feedback-cli create <name>")?;
        line(stdout, "  2. Share its submission URL:  feedback-cli url <id>")?;
        return Ok(());
    }

    write_table(stdout, instances)
}

fn write_table(stdout: &mut dyn Write, instances: &[Instance]) -> Result<(), String> {
    let mut tw = TabWriter::new(&mut *stdout).padding(2);
    writeln!(tw, "NAME\tKEY\tCREATED\tID").map_err(|err| err.to_string())?;
    for instance in instances {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            instance.name,
            key_preview(&instance.key).unwrap_or_else(|| "-".to_string()),
            format_instance_date(instance.created_at),
            instance.id,
        )
        .map_err(|err| err.to_string())?;
    }
    tw.flush().map_err(|err| err.to_string())?;
    Ok(())
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    for token in args {
        match token.as_str() {
            "-h" | "--help" | "help" => return Err(HELP_TEXT.to_string()),
            "--json" => parsed.json = true,
            other => return Err(format!("error: unknown argument for instances: '{other}'")),
        }
    }
    Ok(parsed)
}

const HELP_TEXT: &str = "\
List feedback instances

Usage:
  feedback-cli instances [flags]

Flags:
  -h, --help   help for instances
      --json   output JSON";
