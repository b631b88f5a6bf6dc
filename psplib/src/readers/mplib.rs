//! Multi-project instances (MPLIB1 and MPLIB2, Van Eynde and Vanhoucke).
//!
//! ```text
//! num_projects num_resources
//! capacity_1 ... capacity_R
//! num_activities release_date [due_date]          once per project
//! duration demand_1 ... demand_R                  \ once per activity,
//! num_successors project:activity ...             / project by project
//! ```
//!
//! Successor references are 1-based and scoped to a project. Whether the project
//! lines carry a due date is decided by the first of them and must hold for all.

use log::{debug, trace};

use crate::error::{Location, Mismatch, PspLibError, Record, Result};
use crate::structs::{Activity, Mode, Project, ProjectInstance, Resource};
use crate::tokens::{Line, TokenStream};

const WITHOUT_DUE_DATE: usize = 2;
const WITH_DUE_DATE: usize = 3;

struct ProjectHeader {
    num_activities: usize,
    release_date: u32,
    due_date: Option<u32>,
}

pub fn parse(content: &str) -> Result<ProjectInstance> {
    let mut tokens = TokenStream::new(content);

    let mut header = tokens.next_line(Record::Header, "counts")?;
    let num_projects: usize = header.next_int()?;
    let num_resources: usize = header.next_int()?;
    header.finish()?;

    let mut line = tokens.next_line(Record::Capacities, "capacities")?;
    let capacities: Vec<u32> = line.next_ints(num_resources)?;
    line.finish()?;
    let resources: Vec<Resource> = capacities
        .into_iter()
        .map(|capacity| Resource::new(capacity, true))
        .collect();

    let headers = parse_project_headers(&mut tokens, num_projects)?;

    // First global activity index of each project.
    let mut offsets = vec![];
    let mut num_activities: usize = 0;
    for (idx, header) in headers.iter().enumerate() {
        offsets.push(num_activities);
        num_activities = num_activities
            .checked_add(header.num_activities)
            .ok_or_else(|| {
                PspLibError::mismatch(
                    Location::new(Record::Project(idx), "project information"),
                    Mismatch::CountOverflow,
                )
            })?;
    }
    let counts: Vec<usize> = headers.iter().map(|header| header.num_activities).collect();

    let mut activities = vec![];
    for (project_idx, header) in headers.iter().enumerate() {
        for local in 0..header.num_activities {
            let idx = offsets[project_idx] + local;
            let activity = parse_activity(&mut tokens, idx, num_resources, &offsets, &counts)?
                .with_name(format!("{}:{}", project_idx + 1, local + 1));
            activities.push(activity);
        }
    }

    tokens.expect_end(Record::Instance)?;

    let projects: Vec<Project> = headers
        .iter()
        .zip(&offsets)
        .map(|(header, &offset)| Project {
            activities: (offset..offset + header.num_activities).collect(),
            release_date: header.release_date,
            due_date: header.due_date,
        })
        .collect();

    debug!(
        "Parsed MPLIB instance with {} projects, {} activities and {} resources (due dates: {})",
        projects.len(),
        activities.len(),
        resources.len(),
        projects.iter().any(|project| project.due_date.is_some())
    );

    ProjectInstance::new(resources, activities, projects)
}

fn parse_project_headers(
    tokens: &mut TokenStream<'_>,
    num_projects: usize,
) -> Result<Vec<ProjectHeader>> {
    let mut headers = vec![];
    let mut width = None;

    for idx in 0..num_projects {
        let mut line = tokens.next_line(Record::Project(idx), "project information")?;
        let found = line.len();

        match width {
            None if found == WITHOUT_DUE_DATE || found == WITH_DUE_DATE => width = Some(found),
            None => {
                return Err(PspLibError::mismatch(
                    line.location(),
                    Mismatch::FieldCount {
                        expected: WITHOUT_DUE_DATE,
                        found,
                    },
                ))
            }
            Some(expected) if expected != found => {
                return Err(PspLibError::mismatch(
                    line.location(),
                    Mismatch::DueDateToggle { expected, found },
                ))
            }
            Some(_) => {}
        }

        let num_activities = line.next_int()?;
        let release_date = line.next_int()?;
        let due_date = if found == WITH_DUE_DATE {
            Some(line.next_int()?)
        } else {
            None
        };
        line.finish()?;

        trace!("project {idx}: {num_activities} activities, release {release_date}, due {due_date:?}");

        headers.push(ProjectHeader {
            num_activities,
            release_date,
            due_date,
        });
    }

    Ok(headers)
}

fn parse_activity(
    tokens: &mut TokenStream<'_>,
    idx: usize,
    num_resources: usize,
    offsets: &[usize],
    counts: &[usize],
) -> Result<Activity> {
    let record = Record::Activity(idx);

    let mut line = tokens.next_line(record, "mode")?;
    let duration: u32 = line.next_int()?;
    let demands: Vec<u32> = line.next_ints(num_resources)?;
    line.finish()?;

    let mut line = tokens.next_line(record, "successors")?;
    let num_successors: usize = line.next_int()?;
    let successors = (0..num_successors)
        .map(|_| resolve_reference(&mut line, offsets, counts))
        .collect::<Result<Vec<_>>>()?;
    line.finish()?;

    Activity::new(vec![Mode::new(duration, demands)], successors)
        .map_err(|reason| PspLibError::mismatch(Location::new(record, "modes"), reason))
}

/// Turns a `project:activity` token into a global 0-based activity index.
fn resolve_reference(line: &mut Line<'_>, offsets: &[usize], counts: &[usize]) -> Result<usize> {
    let token = line.next_token()?;
    let malformed = || PspLibError::MalformedToken {
        token: token.to_owned(),
        at: line.location(),
    };

    let (project, activity) = token.split_once(':').ok_or_else(malformed)?;
    let project: usize = project.parse().map_err(|_| malformed())?;
    let activity: usize = activity.parse().map_err(|_| malformed())?;

    match (project.checked_sub(1), activity.checked_sub(1)) {
        (Some(p), Some(a)) if p < counts.len() && a < counts[p] => Ok(offsets[p] + a),
        _ => Err(PspLibError::mismatch(
            line.location(),
            Mismatch::ProjectReference { project, activity },
        )),
    }
}
