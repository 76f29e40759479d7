use std::time::Duration;

use crate::notifications::DEFAULT_TTL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionConfig {
    pub resize_debounce: Duration,
    pub notification_ttl: Duration,
    pub mobile_breakpoint: u32,
    pub save_throttle: Duration,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            resize_debounce: Duration::from_millis(250),
            notification_ttl: DEFAULT_TTL,
            mobile_breakpoint: 768,
            save_throttle: Duration::from_millis(1000),
        }
    }
}
