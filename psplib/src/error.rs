use std::fmt;

use thiserror::Error;

pub type Result<T, E = PspLibError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PspLibError {
    #[error("Failed to read instance: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed token `{token}` in {at}")]
    MalformedToken { token: String, at: Location },
    #[error("Unexpected end of input in {at}")]
    UnexpectedEndOfInput { at: Location },
    #[error("Structural mismatch in {at}: {reason}")]
    StructuralMismatch { at: Location, reason: Mismatch },
}

impl PspLibError {
    pub(crate) fn mismatch(at: Location, reason: Mismatch) -> Self {
        Self::StructuralMismatch { at, reason }
    }

    /// The location the error was raised at, if it came from the input itself.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Io(_) => None,
            Self::MalformedToken { at, .. }
            | Self::UnexpectedEndOfInput { at }
            | Self::StructuralMismatch { at, .. } => Some(at),
        }
    }
}

/// The logical record a reader was assembling when something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Header,
    Capacities,
    Resource(usize),
    Project(usize),
    Activity(usize),
    Instance,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Header => write!(f, "header"),
            Record::Capacities => write!(f, "resource capacities"),
            Record::Resource(idx) => write!(f, "resource {idx}"),
            Record::Project(idx) => write!(f, "project {idx}"),
            Record::Activity(idx) => write!(f, "activity {idx}"),
            Record::Instance => write!(f, "instance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub record: Record,
    pub field: &'static str,
    /// 1-based line number in the original text.
    pub line: Option<usize>,
}

impl Location {
    pub fn new(record: Record, field: &'static str) -> Self {
        Self {
            record,
            field,
            line: None,
        }
    }

    pub fn on_line(self, line: usize) -> Self {
        Self {
            line: Some(line),
            ..self
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.record, self.field)?;
        if let Some(line) = self.line {
            write!(f, ", line {line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("an activity needs at least one mode")]
    NoModes,
    #[error("{delays} delays given for {successors} successors")]
    DelayCount { successors: usize, delays: usize },
    #[error("expected {expected} values, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("{count} unread token(s) left on the line")]
    TrailingTokens { count: usize },
    #[error("unexpected trailing token `{token}` after the last record")]
    TrailingInput { token: String },
    #[error("mode {mode} has {found} demands but the instance has {expected} resources")]
    DemandCount {
        mode: usize,
        expected: usize,
        found: usize,
    },
    #[error("skill vector has {found} entries but the instance has {expected} skills")]
    SkillCount { expected: usize, found: usize },
    #[error("successor {successor} is not one of the {num_activities} activities")]
    SuccessorOutOfRange {
        successor: usize,
        num_activities: usize,
    },
    #[error("activity lists itself as a successor")]
    SelfSuccessor,
    #[error("reference {project}:{activity} does not name an activity")]
    ProjectReference { project: usize, activity: usize },
    #[error("project line has {found} fields, earlier project lines have {expected}")]
    DueDateToggle { expected: usize, found: usize },
    #[error("project activity {activity} is not one of the {num_activities} activities")]
    ProjectActivityOutOfRange {
        activity: usize,
        num_activities: usize,
    },
    #[error("activity {activity} belongs to projects {first} and {second}")]
    ActivityInTwoProjects {
        activity: usize,
        first: usize,
        second: usize,
    },
    #[error("activity {activity} does not belong to any project")]
    UnassignedActivity { activity: usize },
    #[error("{renewable} renewable resources declared but only {resources} capacities given")]
    RenewableCount { renewable: usize, resources: usize },
    #[error("activity counts overflow")]
    CountOverflow,
}
