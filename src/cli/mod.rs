use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod plan;
pub mod serve;

use crate::planner::request::parse_clock_time;

#[derive(Subcommand)]
enum Command {
    /// Start a chat session with the model
    Chat {
        /// Let the model ground answers with web search
        #[arg(long, action, default_value = "false")]
        search: bool,

        /// System prompt for the session
        #[arg(long)]
        system: Option<String>,
    },
    /// Plan a time-blocked schedule and export it as a calendar file
    Plan {
        /// Goals or tasks for the day
        #[arg(long)]
        tasks: String,

        /// Additional preferences, e.g. break intervals
        #[arg(long, default_value = "")]
        preferences: String,

        /// Preferred start time (HH:MM), defaults to the next half hour
        #[arg(long, value_parser = parse_clock_time)]
        start_time: Option<String>,

        /// Day to place the events on (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Directory to write the calendar file to
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Name of the calendar file
        #[arg(long)]
        file_name: Option<String>,

        /// Fail on out of order or unfinished blocks in the reply
        #[arg(long, action, default_value = "false")]
        strict: bool,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Chat { search, system }) => {
            chat::run(search, system).await?;
        }
        Some(Command::Plan {
            tasks,
            preferences,
            start_time,
            date,
            output_dir,
            file_name,
            strict,
        }) => {
            plan::run(plan::PlanArgs {
                tasks,
                preferences,
                start_time,
                date,
                output_dir,
                file_name,
                strict,
            })
            .await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_args() {
        let cli = Cli::try_parse_from([
            "dayplan",
            "plan",
            "--tasks",
            "Write report",
            "--start-time",
            "8:30",
            "--date",
            "2024-01-01",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Plan {
                tasks,
                start_time,
                date,
                strict,
                preferences,
                ..
            }) => {
                assert_eq!(tasks, "Write report");
                assert_eq!(start_time.as_deref(), Some("08:30"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert!(strict);
                assert_eq!(preferences, "");
            }
            _ => panic!("Expected plan command"),
        }
    }

    #[test]
    fn test_plan_rejects_bad_start_time() {
        let result = Cli::try_parse_from(["dayplan", "plan", "--tasks", "x", "--start-time", "9am"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_args() {
        let cli = Cli::try_parse_from(["dayplan", "chat", "--search"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Chat {
                search: true,
                system: None
            })
        ));
    }
}
