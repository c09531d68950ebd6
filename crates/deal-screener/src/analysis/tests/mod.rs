mod common;

mod flip;
mod recommendation;
