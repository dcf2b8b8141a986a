use clap::Args;
use timetable_core::{Config, FilterCriteria, SlotLabel, Weekday};

use super::{load_session, print_offerings};

#[derive(Args)]
pub struct FilterArgs {
    /// Day to keep free (repeatable), e.g. "monday" or "mon"
    #[arg(long = "free-day")]
    free_days: Vec<Weekday>,
    /// Time to keep free (repeatable), e.g. "8-10"
    #[arg(long = "free-time")]
    free_times: Vec<SlotLabel>,
    /// Drop offerings that clash with the selection
    #[arg(long, overrides_with = "no_exclude_conflicting")]
    exclude_conflicting: bool,
    /// Keep clashing offerings even if the config excludes them
    #[arg(long, overrides_with = "exclude_conflicting")]
    no_exclude_conflicting: bool,
    /// Drop offerings of subjects already selected
    #[arg(long, overrides_with = "no_exclude_same_subject")]
    exclude_same_subject: bool,
    /// Keep offerings of selected subjects even if the config excludes them
    #[arg(long, overrides_with = "exclude_same_subject")]
    no_exclude_same_subject: bool,
    /// Summarize the result by subject
    #[arg(long, conflicts_with = "subject")]
    subjects: bool,
    /// Only offerings of this course name
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    json: bool,
}

/// `Some(true)` for `--x`, `Some(false)` for `--no-x`, `None` to keep the config value.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl FilterArgs {
    /// Config defaults with this run's flags applied on top.
    fn criteria(&self, config: &Config) -> FilterCriteria {
        let mut criteria = config.default_criteria();
        if let Some(yes) = switch(self.exclude_conflicting, self.no_exclude_conflicting) {
            criteria = criteria.excluding_conflicts(yes);
        }
        if let Some(yes) = switch(self.exclude_same_subject, self.no_exclude_same_subject) {
            criteria = criteria.excluding_same_subject(yes);
        }
        for day in &self.free_days {
            criteria = criteria.with_free_day(*day);
        }
        for time in &self.free_times {
            criteria = criteria.with_free_time(time.clone());
        }
        criteria
    }
}

pub fn run(args: FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let criteria = args.criteria(&config);
    let (_, session) = load_session()?;

    if args.subjects {
        let summaries = session.subjects(&criteria);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            for s in &summaries {
                println!(
                    "{:<10} {} | {} cr | {} offering(s)",
                    s.course_name, s.display_name, s.credits, s.total_courses
                );
            }
        }
        return Ok(());
    }

    let kept = match args.subject.as_deref() {
        Some(name) => session.subject_offerings(&criteria, name),
        None => session.filter(&criteria),
    };
    print_offerings(&kept, args.json)
}
