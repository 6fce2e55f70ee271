pub mod groups;
pub mod run;
