//! Storygraph - hierarchical story tracking with dependency analysis.
//!
//! This crate provides both a CLI application and a library for managing a
//! three-level story tree (epics, user stories, sub-stories), a typed
//! relationship graph between stories, automatic status propagation up the
//! tree, and dependency-order planning.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod id_generation;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

// Application context shared by CLI commands
pub mod app;

// Output formatting for the CLI
pub mod output;
