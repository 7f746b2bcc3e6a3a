/// Counts rocket sweeps that have started but not finished.
///
/// Gravity may only run when the count returns to zero, which is what
/// [`InFlight::finish`] reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    count: usize,
    peak: usize,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.count += 1;
        self.peak = self.peak.max(self.count);
    }

    /// Returns true exactly when this call brought the count to zero.
    pub fn finish(&mut self) -> bool {
        if self.count == 0 {
            log::error!("in-flight counter underflow");
            return false;
        }
        self.count -= 1;
        self.count == 0
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn is_idle(&self) -> bool {
        self.count == 0
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.peak = 0;
    }
}
