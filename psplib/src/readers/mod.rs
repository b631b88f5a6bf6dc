//! One reader per supported text format.
//!
//! Every reader walks its own grammar over a [`TokenStream`](crate::tokens::TokenStream)
//! and hands the records to [`ProjectInstance::new`](crate::structs::ProjectInstance::new).

pub mod mplib;
pub mod mslib;
pub mod rcpsp_ps;
