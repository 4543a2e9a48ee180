//! Reusable prompts using Handlebars for templating. Strict mode makes
//! a missing variable an error. Escaping is off so input like `R&D`
//! reaches the model verbatim.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    TimeBlockedSchedule,
    AssumptionsSystem,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const TIME_BLOCKED_SCHEDULE_PROMPT: &str = r"
Break down the following tasks into specific 30-minute or 60-minute blocks based on how much effort each one takes, adding a 15-minute break after every 90 minutes of work. Include a start and end time for every block, using the provided starting time as the reference.
If a starting time is not given, pick one that suits the activities.
Tasks: {{tasks}}
Preferences: {{preferences}}
Starting Time: {{start_time}}

Respond with a schedule in a structured format suitable for creating a calendar file (task name, start time, end time).
Use 24 hour notation for all times so they are unambiguous.
Answer directly and only with the following format:
1. Task: Research for Report
Start: 09:00
End: 09:30

2. Task: Write Draft
Start: 09:30
End: 10:00
...
";

const ASSUMPTIONS_SYSTEM_PROMPT: &str = "{{system_prompt}} make the appropriate assumptions";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(
            &Prompt::TimeBlockedSchedule.to_string(),
            TIME_BLOCKED_SCHEDULE_PROMPT,
        )
        .expect("Failed to register template");
    registry
        .register_template_string(
            &Prompt::AssumptionsSystem.to_string(),
            ASSUMPTIONS_SYSTEM_PROMPT,
        )
        .expect("Failed to register template");
    registry
}
