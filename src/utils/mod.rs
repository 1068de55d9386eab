//! Utility modules for playbook-qa

pub mod command;
pub mod json;
