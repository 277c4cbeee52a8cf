pub mod keycode;
pub mod logging;
