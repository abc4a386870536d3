// Module exports for models

pub mod gig;
pub mod settings;
