mod crosswalk;
mod group;

pub use crosswalk::Crosswalk;
pub use group::Group;
