//! Single-bit wire endpoints.

/// One boolean wire endpoint owned by a gate.
///
/// Ports have no identity of their own; a port is addressed by its
/// owning gate and its index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Port {
    value: bool,
}

impl Port {
    /// Create a port holding `value`.
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    /// Current value.
    #[inline]
    pub fn read(&self) -> bool {
        self.value
    }

    /// Overwrite the value.
    #[inline]
    pub fn write(&mut self, value: bool) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_starts_low() {
        assert!(!Port::default().read());
    }

    #[test]
    fn test_port_write() {
        let mut port = Port::new(false);
        port.write(true);
        assert!(port.read());
        port.write(false);
        assert!(!port.read());
    }
}
