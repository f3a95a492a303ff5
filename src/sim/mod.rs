pub mod bossname;
pub mod director;
pub mod event;
pub mod level;
pub mod step;
pub mod world;
