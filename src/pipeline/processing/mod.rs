// Processing stages: parse -> validate -> normalize, then graph building and export

pub mod export;
pub mod graph;
pub mod normalize;
pub mod parser;
pub mod validate;
