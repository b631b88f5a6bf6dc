//! Multi-skill instances (MSLIB, Snauwaert and Vanhoucke).
//!
//! ```text
//! num_activities num_resources num_skills
//! capacity skill_1 ... skill_K                          once per resource
//! duration demand_1 ... demand_R req_1 ... req_K        \ once per activity
//! num_successors succ_1 ... succ_n                      /
//! ```
//!
//! Successors are 1-based activity numbers.

use log::debug;

use crate::error::{Location, Mismatch, PspLibError, Record, Result};
use crate::structs::{Activity, Mode, Project, ProjectInstance, Resource};
use crate::tokens::TokenStream;

pub fn parse(content: &str) -> Result<ProjectInstance> {
    let mut tokens = TokenStream::new(content);

    let mut header = tokens.next_line(Record::Header, "counts")?;
    let num_activities: usize = header.next_int()?;
    let num_resources: usize = header.next_int()?;
    let num_skills: usize = header.next_int()?;
    header.finish()?;

    let resources = (0..num_resources)
        .map(|idx| {
            let mut line = tokens.next_line(Record::Resource(idx), "capacity and skills")?;
            let capacity = line.next_int()?;
            let skills = line.next_ints(num_skills)?;
            line.finish()?;

            Ok(Resource::with_skills(capacity, skills))
        })
        .collect::<Result<Vec<_>>>()?;

    let activities = (0..num_activities)
        .map(|idx| parse_activity(&mut tokens, idx, num_resources, num_skills, num_activities))
        .collect::<Result<Vec<_>>>()?;

    tokens.expect_end(Record::Instance)?;

    debug!(
        "Parsed MSLIB instance with {} activities, {} resources and {} skills",
        activities.len(),
        resources.len(),
        num_skills
    );

    let project = Project::new((0..num_activities).collect());
    ProjectInstance::new(resources, activities, vec![project])
}

fn parse_activity(
    tokens: &mut TokenStream<'_>,
    idx: usize,
    num_resources: usize,
    num_skills: usize,
    num_activities: usize,
) -> Result<Activity> {
    let record = Record::Activity(idx);

    let mut line = tokens.next_line(record, "mode")?;
    let duration: u32 = line.next_int()?;
    let demands: Vec<u32> = line.next_ints(num_resources)?;
    let requirements: Vec<u32> = line.next_ints(num_skills)?;
    line.finish()?;

    let mut line = tokens.next_line(record, "successors")?;
    let num_successors: usize = line.next_int()?;
    let numbers: Vec<usize> = line.next_ints(num_successors)?;
    let at = line.location();
    line.finish()?;

    let successors = numbers
        .into_iter()
        .map(|number| {
            number.checked_sub(1).ok_or_else(|| {
                PspLibError::mismatch(
                    at.clone(),
                    Mismatch::SuccessorOutOfRange {
                        successor: number,
                        num_activities,
                    },
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mode = Mode::with_skill_requirements(duration, demands, requirements);
    Activity::new(vec![mode], successors)
        .map(|activity| activity.with_name((idx + 1).to_string()))
        .map_err(|reason| PspLibError::mismatch(Location::new(record, "modes"), reason))
}
