mod corridor;

pub use corridor::Corridor;
