pub mod rank;
pub mod similarity;
