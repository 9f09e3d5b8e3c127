use crate::config::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Recipients,
    Template,
    Review,
}

impl Step {
    pub fn title(self) -> &'static str {
        match self {
            Step::Recipients => "Recipients",
            Step::Template => "Template",
            Step::Review => "Review",
        }
    }
}

/// Which navigation controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub previous: bool,
    pub next: bool,
    pub apply: bool,
}

/// Step-by-step flow with a 1-based `current` in `[1, total]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    steps: Vec<Step>,
    current: usize,
}

impl Wizard {
    /// Panics on an empty step list.
    pub fn new(steps: Vec<Step>) -> Self {
        assert!(!steps.is_empty(), "wizard needs at least one step");
        Self { steps, current: 1 }
    }

    pub fn for_flow(flow: Flow) -> Self {
        match flow {
            Flow::Wizard => Self::new(vec![Step::Recipients, Step::Template, Step::Review]),
            Flow::TemplateOnly => Self::new(vec![Step::Template]),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self) -> Step {
        self.steps[self.current - 1]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total()
    }

    /// Returns whether the step changed.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 1 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn controls(&self) -> NavControls {
        NavControls {
            previous: self.current != 1,
            next: !self.is_last(),
            apply: self.is_last(),
        }
    }
}
