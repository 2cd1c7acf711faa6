#[macro_use] extern crate diesel;
#[macro_use] extern crate failure;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
extern crate chrono;
extern crate regex;

pub mod util;
pub mod app;
pub mod db;
pub mod model;

pub mod import {
    pub use super::util::error::*;
    pub use std::collections::{HashSet, HashMap};
}
