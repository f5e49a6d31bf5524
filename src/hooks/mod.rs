mod reduced_motion;

pub use reduced_motion::use_reduced_motion;
