//! Input sampling, lamp outputs, and the blink tick.

pub mod debounce;
pub mod lights;
pub mod switches;
pub mod tick;
