mod artifact;
mod common;
mod recommendations;
