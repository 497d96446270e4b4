/// One discrete simulation step.
pub type Tick = u64;

/// Identifies whoever produced an action (a local input device, a script, a replay).
pub type ControllerId = u8;

/// Per-controller action sequence number, used for deterministic ordering.
pub type ActionId = u64;
