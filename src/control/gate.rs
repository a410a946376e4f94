//! Publish-on-change gate.
//!
//! Tracks the last setpoint actually sent and the mode it was sent under.
//! A new command is due when nothing was sent yet, the value changed, or the
//! mode changed (even if the value did not).

use super::OperatingMode;

/// Gate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    NoSetpointSent,
    SetpointSent { rpm: u16, mode: OperatingMode },
}

/// Why a publish is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    /// First setpoint since start.
    Initial,
    /// Quantized value differs from the last one sent.
    ValueChanged,
    /// Mode differs from the one the last setpoint was sent under.
    ModeChanged,
}

#[derive(Debug, Clone, Default)]
pub struct PublishGate {
    state: GateState,
}

impl PublishGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Last setpoint committed, if any.
    pub fn last_published(&self) -> Option<u16> {
        match self.state {
            GateState::NoSetpointSent => None,
            GateState::SetpointSent { rpm, .. } => Some(rpm),
        }
    }

    /// Check whether `(rpm, mode)` must be published. Does not change state.
    pub fn check(&self, rpm: u16, mode: OperatingMode) -> Option<PublishReason> {
        match self.state {
            GateState::NoSetpointSent => Some(PublishReason::Initial),
            GateState::SetpointSent {
                mode: last_mode, ..
            } if last_mode != mode => Some(PublishReason::ModeChanged),
            GateState::SetpointSent { rpm: last_rpm, .. } if last_rpm != rpm => {
                Some(PublishReason::ValueChanged)
            }
            GateState::SetpointSent { .. } => None,
        }
    }

    /// Record `(rpm, mode)` as sent.
    pub fn commit(&mut self, rpm: u16, mode: OperatingMode) {
        self.state = GateState::SetpointSent { rpm, mode };
    }

    /// Check and commit in one step; returns the value to emit, if any.
    pub fn offer(&mut self, rpm: u16, mode: OperatingMode) -> Option<u16> {
        self.check(rpm, mode)?;
        self.commit(rpm, mode);
        Some(rpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_offer_always_publishes() {
        let mut gate = PublishGate::new();
        assert_eq!(gate.last_published(), None);
        assert_eq!(gate.check(0, OperatingMode::Manual), Some(PublishReason::Initial));
        assert_eq!(gate.offer(0, OperatingMode::Manual), Some(0));
        assert_eq!(gate.last_published(), Some(0));
    }

    #[test]
    fn test_repeated_value_publishes_once() {
        let mut gate = PublishGate::new();
        let emitted: Vec<_> = (0..10)
            .filter_map(|_| gate.offer(170, OperatingMode::Auto))
            .collect();
        assert_eq!(emitted, vec![170]);
    }

    #[test]
    fn test_value_change_publishes() {
        let mut gate = PublishGate::new();
        gate.offer(170, OperatingMode::Auto);
        assert_eq!(
            gate.check(175, OperatingMode::Auto),
            Some(PublishReason::ValueChanged)
        );
        assert_eq!(gate.offer(175, OperatingMode::Auto), Some(175));
        assert_eq!(gate.offer(175, OperatingMode::Auto), None);
    }

    #[test]
    fn test_mode_change_forces_publish() {
        let mut gate = PublishGate::new();
        gate.offer(170, OperatingMode::Auto);
        assert_eq!(
            gate.check(170, OperatingMode::Manual),
            Some(PublishReason::ModeChanged)
        );
        assert_eq!(gate.offer(170, OperatingMode::Manual), Some(170));
        assert_eq!(
            gate.state(),
            GateState::SetpointSent {
                rpm: 170,
                mode: OperatingMode::Manual
            }
        );
        assert_eq!(gate.offer(170, OperatingMode::Manual), None);
    }

    #[test]
    fn test_check_does_not_commit() {
        let gate = PublishGate::new();
        gate.check(50, OperatingMode::Budget);
        assert_eq!(gate.state(), GateState::NoSetpointSent);
    }
}
