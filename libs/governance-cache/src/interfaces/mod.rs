pub mod governor_hub;
pub mod governor_spoke;
