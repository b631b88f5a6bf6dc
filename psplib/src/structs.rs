use serde::Serialize;

use crate::error::{Location, Mismatch, PspLibError, Record, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub capacity: u32,
    pub renewable: bool,
    /// Units of each skill type this resource contributes (multi-skill instances only).
    pub skills: Option<Vec<u32>>,
}

impl Resource {
    pub fn new(capacity: u32, renewable: bool) -> Self {
        Self {
            capacity,
            renewable,
            skills: None,
        }
    }

    pub fn with_skills(capacity: u32, skills: Vec<u32>) -> Self {
        Self {
            capacity,
            renewable: true,
            skills: Some(skills),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode {
    pub duration: u32,
    /// One demand per resource, aligned by resource index.
    pub demands: Vec<u32>,
    /// Units required per skill type (multi-skill instances only).
    pub skill_requirements: Option<Vec<u32>>,
}

impl Mode {
    pub fn new(duration: u32, demands: Vec<u32>) -> Self {
        Self {
            duration,
            demands,
            skill_requirements: None,
        }
    }

    pub fn with_skill_requirements(
        duration: u32,
        demands: Vec<u32>,
        skill_requirements: Vec<u32>,
    ) -> Self {
        Self {
            duration,
            demands,
            skill_requirements: Some(skill_requirements),
        }
    }
}

/// An activity with its processing modes and outgoing precedences.
///
/// Successors are 0-based indices into [`ProjectInstance::activities`]. When
/// delays are present there is exactly one per successor and the precedence
/// reads `start(self) + delay <= start(successor)`; otherwise it is the plain
/// finish-to-start relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    modes: Vec<Mode>,
    successors: Vec<usize>,
    delays: Option<Vec<i64>>,
    name: String,
    optional: bool,
    selection_groups: Vec<Vec<usize>>,
}

impl Activity {
    pub fn new(modes: Vec<Mode>, successors: Vec<usize>) -> Result<Self, Mismatch> {
        if modes.is_empty() {
            return Err(Mismatch::NoModes);
        }

        Ok(Self {
            modes,
            successors,
            delays: None,
            name: String::new(),
            optional: false,
            selection_groups: vec![],
        })
    }

    pub fn with_delays(self, delays: Vec<i64>) -> Result<Self, Mismatch> {
        if delays.len() != self.successors.len() {
            return Err(Mismatch::DelayCount {
                successors: self.successors.len(),
                delays: delays.len(),
            });
        }

        Ok(Self {
            delays: Some(delays),
            ..self
        })
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_optional(self, optional: bool) -> Self {
        Self { optional, ..self }
    }

    pub fn with_selection_groups(self, selection_groups: Vec<Vec<usize>>) -> Self {
        Self {
            selection_groups,
            ..self
        }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn successors(&self) -> &[usize] {
        &self.successors
    }

    pub fn delays(&self) -> Option<&[i64]> {
        self.delays.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    /// At least one successor of every group has to be selected whenever
    /// this activity is part of the schedule.
    pub fn selection_groups(&self) -> &[Vec<usize>] {
        &self.selection_groups
    }

    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub activities: Vec<usize>,
    pub release_date: u32,
    pub due_date: Option<u32>,
}

impl Project {
    pub fn new(activities: Vec<usize>) -> Self {
        Self {
            activities,
            release_date: 0,
            due_date: None,
        }
    }

    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }
}

/// Multi-project, multi-mode resource-constrained project scheduling instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInstance {
    resources: Vec<Resource>,
    activities: Vec<Activity>,
    projects: Vec<Project>,
}

impl ProjectInstance {
    /// Assembles an instance, checking that every record agrees with the others.
    pub fn new(
        resources: Vec<Resource>,
        activities: Vec<Activity>,
        projects: Vec<Project>,
    ) -> Result<Self> {
        let instance = Self {
            resources,
            activities,
            projects,
        };

        instance.check_resources()?;
        instance.check_activities()?;
        instance.check_projects()?;

        Ok(instance)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }

    pub fn num_projects(&self) -> usize {
        self.projects.len()
    }

    /// Number of skill types, 0 unless this is a multi-skill instance.
    pub fn num_skills(&self) -> usize {
        self.resources
            .iter()
            .find_map(|resource| resource.skills.as_ref())
            .or_else(|| {
                self.activities
                    .iter()
                    .flat_map(|activity| &activity.modes)
                    .find_map(|mode| mode.skill_requirements.as_ref())
            })
            .map_or(0, Vec::len)
    }

    fn check_resources(&self) -> Result<()> {
        let num_skills = self.num_skills();

        for (idx, resource) in self.resources.iter().enumerate() {
            if let Some(skills) = &resource.skills {
                if skills.len() != num_skills {
                    return Err(PspLibError::mismatch(
                        Location::new(Record::Resource(idx), "skills"),
                        Mismatch::SkillCount {
                            expected: num_skills,
                            found: skills.len(),
                        },
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_activities(&self) -> Result<()> {
        let num_resources = self.num_resources();
        let num_skills = self.num_skills();
        let num_activities = self.num_activities();

        for (idx, activity) in self.activities.iter().enumerate() {
            let at = |field| Location::new(Record::Activity(idx), field);

            for (mode_idx, mode) in activity.modes.iter().enumerate() {
                if mode.demands.len() != num_resources {
                    return Err(PspLibError::mismatch(
                        at("demands"),
                        Mismatch::DemandCount {
                            mode: mode_idx,
                            expected: num_resources,
                            found: mode.demands.len(),
                        },
                    ));
                }

                if let Some(requirements) = &mode.skill_requirements {
                    if requirements.len() != num_skills {
                        return Err(PspLibError::mismatch(
                            at("skill requirements"),
                            Mismatch::SkillCount {
                                expected: num_skills,
                                found: requirements.len(),
                            },
                        ));
                    }
                }
            }

            for &successor in &activity.successors {
                if successor >= num_activities {
                    return Err(PspLibError::mismatch(
                        at("successors"),
                        Mismatch::SuccessorOutOfRange {
                            successor,
                            num_activities,
                        },
                    ));
                }
                if successor == idx {
                    return Err(PspLibError::mismatch(
                        at("successors"),
                        Mismatch::SelfSuccessor,
                    ));
                }
            }

            for &successor in activity.selection_groups.iter().flatten() {
                if successor >= num_activities {
                    return Err(PspLibError::mismatch(
                        at("selection groups"),
                        Mismatch::SuccessorOutOfRange {
                            successor,
                            num_activities,
                        },
                    ));
                }
                if successor == idx {
                    return Err(PspLibError::mismatch(
                        at("selection groups"),
                        Mismatch::SelfSuccessor,
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_projects(&self) -> Result<()> {
        let num_activities = self.num_activities();
        let mut owner: Vec<Option<usize>> = vec![None; num_activities];

        for (project_idx, project) in self.projects.iter().enumerate() {
            let at = Location::new(Record::Project(project_idx), "activities");

            for &activity in &project.activities {
                let slot = owner.get_mut(activity).ok_or_else(|| {
                    PspLibError::mismatch(
                        at.clone(),
                        Mismatch::ProjectActivityOutOfRange {
                            activity,
                            num_activities,
                        },
                    )
                })?;

                if let Some(first) = slot.replace(project_idx) {
                    return Err(PspLibError::mismatch(
                        at,
                        Mismatch::ActivityInTwoProjects {
                            activity,
                            first,
                            second: project_idx,
                        },
                    ));
                }
            }
        }

        if let Some(activity) = owner.iter().position(Option::is_none) {
            return Err(PspLibError::mismatch(
                Location::new(Record::Instance, "projects"),
                Mismatch::UnassignedActivity { activity },
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(demands: Vec<u32>, successors: Vec<usize>) -> Activity {
        Activity::new(vec![Mode::new(1, demands)], successors).unwrap()
    }

    #[test]
    fn activity_requires_a_mode() {
        assert_eq!(Activity::new(vec![], vec![1]), Err(Mismatch::NoModes));
    }

    #[test]
    fn delays_must_match_successors() {
        let err = activity(vec![0], vec![1, 2]).with_delays(vec![3]).unwrap_err();

        assert_eq!(
            err,
            Mismatch::DelayCount {
                successors: 2,
                delays: 1
            }
        );
    }

    #[test]
    fn delays_are_kept_when_lengths_agree() {
        let activity = activity(vec![0], vec![1, 2]).with_delays(vec![3, -1]).unwrap();

        assert_eq!(activity.delays(), Some(&[3, -1][..]));
        assert_eq!(activity.num_modes(), 1);
    }

    #[test]
    fn derived_counts() {
        let instance = ProjectInstance::new(
            vec![Resource::new(4, true), Resource::new(10, false)],
            vec![activity(vec![0, 0], vec![1]), activity(vec![2, 1], vec![])],
            vec![Project::new(vec![0, 1])],
        )
        .unwrap();

        assert_eq!(instance.num_resources(), 2);
        assert_eq!(instance.num_activities(), 2);
        assert_eq!(instance.num_projects(), 1);
        assert_eq!(instance.num_skills(), 0);
        assert_eq!(instance.projects()[0].num_activities(), 2);
    }

    #[test]
    fn num_skills_follows_resource_skill_vectors() {
        let mode = Mode::with_skill_requirements(2, vec![0], vec![0, 1, 0]);
        let instance = ProjectInstance::new(
            vec![Resource::with_skills(1, vec![1, 1, 0])],
            vec![Activity::new(vec![mode], vec![]).unwrap()],
            vec![Project::new(vec![0])],
        )
        .unwrap();

        assert_eq!(instance.num_skills(), 3);
    }

    #[test]
    fn skill_requirement_length_is_checked() {
        let mode = Mode::with_skill_requirements(2, vec![0], vec![0, 1]);
        let result = ProjectInstance::new(
            vec![Resource::with_skills(1, vec![1, 1, 0])],
            vec![Activity::new(vec![mode], vec![]).unwrap()],
            vec![Project::new(vec![0])],
        );

        assert!(matches!(
            result,
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::SkillCount {
                    expected: 3,
                    found: 2
                },
                ..
            })
        ));
    }

    #[test]
    fn demand_length_is_checked() {
        let result = ProjectInstance::new(
            vec![Resource::new(4, true)],
            vec![activity(vec![0, 0], vec![])],
            vec![Project::new(vec![0])],
        );

        assert!(matches!(
            result,
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::DemandCount { .. },
                ..
            })
        ));
    }

    #[test]
    fn successor_out_of_range() {
        let result = ProjectInstance::new(
            vec![],
            vec![activity(vec![], vec![2]), activity(vec![], vec![])],
            vec![Project::new(vec![0, 1])],
        );

        match result {
            Err(PspLibError::StructuralMismatch { at, reason }) => {
                assert_eq!(at.record, Record::Activity(0));
                assert_eq!(
                    reason,
                    Mismatch::SuccessorOutOfRange {
                        successor: 2,
                        num_activities: 2
                    }
                );
            }
            other => panic!("expected a structural mismatch, got {other:?}"),
        }
    }

    #[test]
    fn self_successor_is_rejected() {
        let result = ProjectInstance::new(
            vec![],
            vec![activity(vec![], vec![]), activity(vec![], vec![1])],
            vec![Project::new(vec![0, 1])],
        );

        assert!(matches!(
            result,
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::SelfSuccessor,
                ..
            })
        ));
    }

    #[test]
    fn selection_group_entry_out_of_range() {
        let source = activity(vec![], vec![1]).with_selection_groups(vec![vec![1], vec![4]]);
        let result = ProjectInstance::new(
            vec![],
            vec![source, activity(vec![], vec![])],
            vec![Project::new(vec![0, 1])],
        );

        match result {
            Err(PspLibError::StructuralMismatch { at, reason }) => {
                assert_eq!(at.record, Record::Activity(0));
                assert_eq!(at.field, "selection groups");
                assert_eq!(
                    reason,
                    Mismatch::SuccessorOutOfRange {
                        successor: 4,
                        num_activities: 2
                    }
                );
            }
            other => panic!("expected a structural mismatch, got {other:?}"),
        }
    }

    #[test]
    fn selection_group_cannot_name_its_own_activity() {
        let second = activity(vec![], vec![]).with_selection_groups(vec![vec![0, 1]]);
        let result = ProjectInstance::new(
            vec![],
            vec![activity(vec![], vec![1]), second],
            vec![Project::new(vec![0, 1])],
        );

        match result {
            Err(PspLibError::StructuralMismatch { at, reason }) => {
                assert_eq!(at.record, Record::Activity(1));
                assert_eq!(at.field, "selection groups");
                assert_eq!(reason, Mismatch::SelfSuccessor);
            }
            other => panic!("expected a structural mismatch, got {other:?}"),
        }
    }

    #[test]
    fn resource_skill_vectors_must_agree() {
        let mode = Mode::with_skill_requirements(2, vec![0, 0], vec![0, 1, 0]);
        let result = ProjectInstance::new(
            vec![
                Resource::with_skills(1, vec![1, 1, 0]),
                Resource::with_skills(1, vec![1, 1]),
            ],
            vec![Activity::new(vec![mode], vec![]).unwrap()],
            vec![Project::new(vec![0])],
        );

        match result {
            Err(PspLibError::StructuralMismatch { at, reason }) => {
                assert_eq!(at.record, Record::Resource(1));
                assert_eq!(at.field, "skills");
                assert_eq!(
                    reason,
                    Mismatch::SkillCount {
                        expected: 3,
                        found: 2
                    }
                );
            }
            other => panic!("expected a structural mismatch, got {other:?}"),
        }
    }

    #[test]
    fn activity_in_two_projects() {
        let result = ProjectInstance::new(
            vec![],
            vec![activity(vec![], vec![]), activity(vec![], vec![])],
            vec![Project::new(vec![0, 1]), Project::new(vec![1])],
        );

        assert!(matches!(
            result,
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::ActivityInTwoProjects {
                    activity: 1,
                    first: 0,
                    second: 1
                },
                ..
            })
        ));
    }

    #[test]
    fn every_activity_needs_a_project() {
        let result = ProjectInstance::new(
            vec![],
            vec![activity(vec![], vec![]), activity(vec![], vec![])],
            vec![Project::new(vec![1])],
        );

        assert!(matches!(
            result,
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::UnassignedActivity { activity: 0 },
                ..
            })
        ));
    }

    #[test]
    fn project_activity_out_of_range() {
        let result = ProjectInstance::new(
            vec![],
            vec![activity(vec![], vec![])],
            vec![Project::new(vec![0, 5])],
        );

        assert!(matches!(
            result,
            Err(PspLibError::StructuralMismatch {
                reason: Mismatch::ProjectActivityOutOfRange {
                    activity: 5,
                    num_activities: 1
                },
                ..
            })
        ));
    }
}
