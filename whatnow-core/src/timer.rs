//! Focus timer: an elapsed-seconds counter driven by an external
//! one-second tick.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTimer {
    task_id: Option<String>,
    seconds: u32,
    running: bool,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from zero for `task_id`.
    pub fn start(&mut self, task_id: impl Into<String>) {
        self.task_id = Some(task_id.into());
        self.seconds = 0;
        self.running = true;
    }

    /// One elapsed second; ignored while paused or stopped.
    pub fn tick(&mut self) {
        if self.running {
            self.seconds = self.seconds.saturating_add(1);
        }
    }

    /// Pause or resume without resetting. Returns the new running state.
    pub fn toggle_pause(&mut self) -> bool {
        if self.task_id.is_some() {
            self.running = !self.running;
        }
        self.running
    }

    /// Discard the counter. Nothing is credited.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Stop and hand back the elapsed seconds for a completion.
    pub fn finish(&mut self) -> Option<u32> {
        self.task_id.as_ref()?;
        let secs = self.seconds;
        self.cancel();
        Some(secs)
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// ⌈seconds / 60⌉, or `None` before the first second.
    pub fn minutes_spent(&self) -> Option<u32> {
        (self.seconds > 0).then(|| self.seconds.div_ceil(60))
    }

    /// "MM:SS".
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}
