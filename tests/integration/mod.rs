//! Integration tests for loadtree

mod cli_contracts;
mod context_lifecycle;
mod install_metadata;
mod name_properties;
mod resolution;
mod support;
