mod unit;

pub use unit::TimeUnit;
