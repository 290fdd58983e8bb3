#![allow(dead_code)]

pub mod remixid_env;
pub mod signals;
pub mod wav;
