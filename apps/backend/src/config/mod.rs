//! Configuration helpers.

pub mod db;
