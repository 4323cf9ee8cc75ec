//! Integration tests for kol-agent

mod config_test;
mod format_props;
mod pipeline_test;
mod webhook_test;
