pub mod inspect;
pub mod merge;
