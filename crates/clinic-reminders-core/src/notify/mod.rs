//! Notification trigger: due-reminder detection, the delivery sink
//! capability, and the periodic background worker.

mod sink;
mod trigger;
mod worker;

pub use sink::*;
pub use trigger::*;
pub use worker::*;
