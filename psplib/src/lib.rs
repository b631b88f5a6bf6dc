//! Readers for RCPSP-family benchmark instances.
//!
//! Every supported format is turned into the same [`ProjectInstance`]:
//!
//! - RCPSP-PS, precedence selection with optional activities;
//! - MPLIB1 and MPLIB2, multiple projects with optional due dates;
//! - MSLIB, multi-skill resources.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

pub mod error;
pub mod readers;
pub mod structs;
pub mod tokens;

pub use error::{Location, Mismatch, PspLibError, Record, Result};
pub use readers::mplib::parse as parse_mplib;
pub use readers::mslib::parse as parse_mslib;
pub use readers::rcpsp_ps::parse as parse_rcpsp_ps;
pub use structs::{Activity, Mode, Project, ProjectInstance, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    RcpspPs,
    Mplib1,
    Mplib2,
    Mslib,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::RcpspPs, Format::Mplib1, Format::Mplib2, Format::Mslib];

    pub fn name(self) -> &'static str {
        match self {
            Format::RcpspPs => "rcpsp-ps",
            Format::Mplib1 => "mplib1",
            Format::Mplib2 => "mplib2",
            Format::Mslib => "mslib",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown instance format `{0}` (expected one of rcpsp-ps, mplib1, mplib2, mslib)")]
pub struct UnknownFormat(String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormat(s.to_owned()))
    }
}

pub fn parse(format: Format, content: &str) -> Result<ProjectInstance> {
    debug!("Parsing {format} instance ({} bytes)", content.len());

    match format {
        Format::RcpspPs => parse_rcpsp_ps(content),
        Format::Mplib1 | Format::Mplib2 => parse_mplib(content),
        Format::Mslib => parse_mslib(content),
    }
}

/// Reads the whole source before parsing.
pub fn parse_reader<R: Read>(format: Format, mut reader: R) -> Result<ProjectInstance> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    parse(format, &content)
}

pub fn parse_file<P: AsRef<Path>>(format: Format, path: P) -> Result<ProjectInstance> {
    let path = path.as_ref();
    debug!("Reading {format} instance from {}", path.display());

    parse_reader(format, File::open(path)?)
}
