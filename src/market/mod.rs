pub mod client;
pub mod warframe;
