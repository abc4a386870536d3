// Service module exports

pub mod clock;
pub mod countdown;
pub mod lifecycle;
pub mod seed;
pub mod settings;
pub mod timer;
