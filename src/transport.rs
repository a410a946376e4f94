//! Setpoint egress.
//!
//! The controller only needs to hand a payload to a topic. Connection
//! management, reconnects and TLS belong to the concrete client.

use std::io::Write;

use crate::error::{ControlError, Result};

/// Publish side of a pub/sub client.
pub trait Transport {
    /// Publish `payload` on `topic`.
    ///
    /// # Errors
    /// Returns an error if the message could not be handed to the broker;
    /// the controller will retry on its next recomputation.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<()>;
}

/// Writes each message as `<topic> <payload>` on its own line.
#[derive(Debug)]
pub struct ConsoleTransport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleTransport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Transport for ConsoleTransport<W> {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<()> {
        writeln!(self.out, "{} {}", topic, payload)
            .and_then(|_| self.out.flush())
            .map_err(|e| ControlError::Transport(format!("Failed to write to console: {}", e)))
    }
}

/// In-memory transport for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryTransport {
    pub messages: Vec<(String, String)>,
    pub fail: bool,
}

#[cfg(test)]
impl MemoryTransport {
    pub fn payloads(&self) -> Vec<&str> {
        self.messages.iter().map(|(_, p)| p.as_str()).collect()
    }
}

#[cfg(test)]
impl Transport for MemoryTransport {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<()> {
        if self.fail {
            return Err(ControlError::Transport("broker unreachable".into()));
        }
        self.messages.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_transport_format() {
        let mut transport = ConsoleTransport::new(Vec::new());
        transport.publish("motor/command/setpoint", "170").unwrap();
        transport.publish("motor/command/setpoint", "0").unwrap();

        let out = String::from_utf8(transport.into_inner()).unwrap();
        assert_eq!(out, "motor/command/setpoint 170\nmotor/command/setpoint 0\n");
    }
}
