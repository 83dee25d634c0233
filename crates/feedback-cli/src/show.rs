use std::io::Write;

use serde::Serialize;

use feedback_core::models::{stars, FeedbackItem, Instance, RatingFilter, RATING_FILTER_OPTIONS};
use feedback_view::detail::{DetailController, DetailState};
use feedback_view::display::{avatar_initial, format_feedback_timestamp, format_instance_date};

use crate::output::{line, take_value, write_json};
use crate::CommandContext;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ParsedArgs {
    json: bool,
    id: String,
    rating: i64,
}

#[derive(Debug, Serialize)]
struct ShowResult<'a> {
    instance: &'a Instance,
    submission_url: String,
    rating_filter: i64,
    count: usize,
    feedback: Vec<&'a FeedbackItem>,
}

pub(crate) async fn execute(
    args: &[String],
    ctx: &mut CommandContext<'_>,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    let parsed = parse_args(args)?;

    let mut detail = DetailController::new(ctx.config.clone());
    if let DetailState::Error(message) = detail.open(ctx.api, &parsed.id, None).await {
        return Err(message.clone());
    }
    detail.set_rating_filter(RatingFilter::from_value(parsed.rating));

    let Some(instance) = detail.instance() else {
        return Err(format!("error: instance '{}' did not resolve", parsed.id));
    };
    let submission_url = ctx.config.submission_url(&instance.key);
    let feedback = detail.feedback();

    if parsed.json {
        return write_json(
            stdout,
            &ShowResult {
                instance,
                submission_url,
                rating_filter: feedback.filter().value(),
                count: feedback.count(),
                feedback: feedback.visible(),
            },
        );
    }

    line(stdout, &instance.name)?;
    line(stdout, format!("Key:            {}", instance.key))?;
    let created = format_instance_date(instance.created_at);
    if !created.is_empty() {
        line(stdout, format!("Created:        {created}"))?;
    }
    line(stdout, format!("Submission URL: {submission_url}"))?;
    line(stdout, "")?;
    line(
        stdout,
        format!("Feedback ({}): {}", feedback.filter(), feedback.count_label()),
    )?;

    if feedback.is_empty_state() {
        if feedback.items().is_empty() {
            line(stdout, "No feedback yet.")?;
            line(stdout, "")?;
            line(stdout, "How to collect feedback:")?;
            line(stdout, format!("  Send users to {submission_url}"))?;
        } else {
            line(stdout, "No feedback matches this rating.")?;
        }
        return Ok(());
    }

    for item in feedback.visible() {
        write_item(stdout, item)?;
    }
    Ok(())
}

fn write_item(stdout: &mut dyn Write, item: &FeedbackItem) -> Result<(), String> {
    let name = item.display_name();
    let mut header = format!("[{}] {}  {}", avatar_initial(name), stars(item.rating), name);
    if let Some(email) = item.user_email.as_deref().filter(|email| !email.is_empty()) {
        header.push_str(&format!(" <{email}>"));
    }
    let when = format_feedback_timestamp(item.created_at);
    if !when.is_empty() {
        header.push_str(&format!("  {when}"));
    }
    line(stdout, "")?;
    line(stdout, header)?;
    if let Some(message) = item.message.as_deref() {
        for text in message.lines() {
            line(stdout, format!("  {text}"))?;
        }
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    let mut index = 0usize;
    while let Some(token) = args.get(index) {
        match token.as_str() {
            "-h" | "--help" | "help" => return Err(HELP_TEXT.to_string()),
            "--json" => {
                parsed.json = true;
                index += 1;
            }
            "--rating" => {
                let raw = take_value(args, index, "--rating")?;
                parsed.rating = parse_rating(&raw)?;
                index += 2;
            }
            flag if flag.starts_with('-') => {
                return Err(format!("error: unknown argument for show: '{flag}'"));
            }
            value => {
                if !parsed.id.is_empty() {
                    return Err("error: accepts at most 1 argument".to_string());
                }
                parsed.id = value.to_string();
                index += 1;
            }
        }
    }

    if parsed.id.trim().is_empty() {
        return Err("error: instance ID required".to_string());
    }
    Ok(parsed)
}

fn parse_rating(raw: &str) -> Result<i64, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("error: invalid value for --rating: '{raw}'"))?;
    if !RATING_FILTER_OPTIONS.contains(&value) {
        return Err(format!(
            "error: --rating must be between 0 and 5 (got {value})"
        ));
    }
    Ok(value)
}

const HELP_TEXT: &str = "\
Show an instance and its feedback

Usage:
  feedback-cli show <id> [flags]

Flags:
  -h, --help           help for show
      --json           output JSON
      --rating int     only feedback with this star rating (0 shows all)";
