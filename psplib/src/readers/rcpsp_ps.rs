//! RCPSP with precedence selection (Van der Beek et al., 2024).
//!
//! ```text
//! num_activities num_renewable <unused>
//! capacity_1 ... capacity_R
//! duration demand_1 ... demand_R        \
//! num_groups (k succ_1 ... succ_k)*      > once per activity
//! num_successors succ_1 ... succ_n      /
//! ```
//!
//! Activity indices are 0-based in the file. The selection group block is read
//! flat and may wrap across lines.

use log::debug;

use crate::error::{Location, Mismatch, PspLibError, Record, Result};
use crate::structs::{Activity, Mode, Project, ProjectInstance, Resource};
use crate::tokens::TokenStream;

pub fn parse(content: &str) -> Result<ProjectInstance> {
    let mut tokens = TokenStream::new(content);

    let mut header = tokens.next_line(Record::Header, "counts")?;
    let num_activities: usize = header.next_int()?;
    let num_renewable: usize = header.next_int()?;
    let _: i64 = header.next_int()?;
    header.finish()?;

    let mut line = tokens.next_line(Record::Capacities, "capacities")?;
    let capacities: Vec<u32> = line.rest_ints()?;
    if num_renewable > capacities.len() {
        return Err(PspLibError::mismatch(
            line.location(),
            Mismatch::RenewableCount {
                renewable: num_renewable,
                resources: capacities.len(),
            },
        ));
    }

    // Renewable resources come first; the file has no other way to tell them apart.
    let resources: Vec<Resource> = capacities
        .iter()
        .enumerate()
        .map(|(idx, &capacity)| Resource::new(capacity, idx < num_renewable))
        .collect();

    let activities = (0..num_activities)
        .map(|idx| parse_activity(&mut tokens, idx, resources.len()))
        .collect::<Result<Vec<_>>>()?;

    tokens.expect_end(Record::Instance)?;

    debug!(
        "Parsed RCPSP-PS instance with {} activities and {} resources ({} renewable)",
        activities.len(),
        resources.len(),
        num_renewable
    );

    let project = Project::new((0..num_activities).collect());
    ProjectInstance::new(resources, activities, vec![project])
}

fn parse_activity(
    tokens: &mut TokenStream<'_>,
    idx: usize,
    num_resources: usize,
) -> Result<Activity> {
    let record = Record::Activity(idx);

    let mut line = tokens.next_line(record, "mode")?;
    let duration: u32 = line.next_int()?;
    let demands: Vec<u32> = line.rest_ints()?;
    if demands.len() != num_resources {
        return Err(PspLibError::mismatch(
            line.location(),
            Mismatch::FieldCount {
                expected: num_resources,
                found: demands.len(),
            },
        ));
    }

    let num_groups: usize = tokens.next_int(record, "selection groups")?;
    let mut groups = vec![];
    for _ in 0..num_groups {
        let size: usize = tokens.next_int(record, "selection groups")?;
        groups.push(tokens.next_ints(size, record, "selection groups")?);
    }

    let mut line = tokens.next_line(record, "successors")?;
    let num_successors: usize = line.next_int()?;
    let successors: Vec<usize> = line.next_ints(num_successors)?;
    line.finish()?;

    Activity::new(vec![Mode::new(duration, demands)], successors)
        .map(|activity| {
            activity
                .with_selection_groups(groups)
                // The source activity is never optional.
                .with_optional(idx > 0)
        })
        .map_err(|reason| PspLibError::mismatch(Location::new(record, "modes"), reason))
}
