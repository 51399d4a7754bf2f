//! End-to-end scenarios for the intake pipeline, run against throwaway
//! workspaces on the real filesystem.

#![cfg(test)]

mod intake;
mod util;
