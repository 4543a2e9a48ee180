use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;

use crate::core::{AppConfig, logging};
use crate::gemini::{GeminiModel, default_safety_settings};
use crate::planner::{ParseMode, ScheduleRequest, ScheduleTextParser, ics, plan_schedule};

pub struct PlanArgs {
    pub tasks: String,
    pub preferences: String,
    pub start_time: Option<String>,
    pub date: Option<NaiveDate>,
    pub output_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub strict: bool,
}

pub async fn run(args: PlanArgs) -> Result<()> {
    logging::init(&format!("{}=info", env!("CARGO_CRATE_NAME")));

    let config = AppConfig::from_env()?;
    let model = GeminiModel::new(
        &config.gemini_api_hostname,
        &config.gemini_api_key,
        &config.schedule_model,
    )
    .safety_settings(default_safety_settings());

    let request = ScheduleRequest::new(&args.tasks, &args.preferences, args.start_time.as_deref());
    let parser = match args.date {
        Some(date) => ScheduleTextParser::new(date, config.timezone),
        None => ScheduleTextParser::today(config.timezone),
    };
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let planned = plan_schedule(&model, &request, &parser.mode(mode)).await?;

    println!("### Your Optimized Schedule\n");
    println!("{}", planned.schedule_text.trim());

    let dir = args.output_dir.unwrap_or(config.output_dir);
    let path = ics::export(&planned.events, &dir, args.file_name.as_deref())?;
    println!(
        "\nSaved {} event(s) to {} ({})",
        planned.events.len(),
        path.display(),
        ics::CONTENT_TYPE
    );

    Ok(())
}
