use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, trace};
use psplib::{parse_file, Format, ProjectInstance};

pub fn parse(format: Format, path: PathBuf, json: bool, pretty: bool) -> Result<()> {
    let instance = parse_file(format, &path)
        .with_context(|| format!("Failed to parse {format} instance {path:?}"))?;
    trace!("parsed instance: {instance:#?}");

    info!(
        "Parsed {:?}: {} activities in {} project(s)",
        path,
        instance.num_activities(),
        instance.num_projects()
    );

    if json {
        let output = if pretty {
            serde_json::to_string_pretty(&instance)?
        } else {
            serde_json::to_string(&instance)?
        };
        println!("{output}");
    } else {
        print!("{}", summary(format, &instance));
    }

    Ok(())
}

fn summary(format: Format, instance: &ProjectInstance) -> String {
    let renewable = instance
        .resources()
        .iter()
        .filter(|resource| resource.renewable)
        .count();

    let mut out = format!(
        "format:     {format}\n\
         resources:  {} ({renewable} renewable)\n\
         activities: {}\n\
         projects:   {}\n",
        instance.num_resources(),
        instance.num_activities(),
        instance.num_projects()
    );
    if instance.num_skills() > 0 {
        out.push_str(&format!("skills:     {}\n", instance.num_skills()));
    }

    for (idx, project) in instance.projects().iter().enumerate() {
        let due_date = project
            .due_date
            .map_or_else(|| "-".to_owned(), |due| due.to_string());
        out.push_str(&format!(
            "  project {idx}: {} activities, release {}, due {due_date}\n",
            project.num_activities(),
            project.release_date
        ));
    }

    out
}
