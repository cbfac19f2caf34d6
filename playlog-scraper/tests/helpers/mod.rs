//! Test Helper Utilities
//!
//! Shared utilities for testing playlog-scraper

#![allow(dead_code)]

pub mod db_utils;
pub mod scripted_adapter;

pub use db_utils::{count_rows, create_test_db, fixed_now, insert_station, plays, utc_ts, PlayRow};
pub use scripted_adapter::{fetch_error, parse_error, ScriptedAdapter, SCRIPTED_TAG};
