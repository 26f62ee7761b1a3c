mod common;

mod ranking;
mod status;
mod view;
