pub mod dialog;
pub mod status;
pub mod textarea;
pub mod toolbar;
