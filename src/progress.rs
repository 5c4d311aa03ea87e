/// Completed focus sessions against the daily goal, capped at the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: u32,
    pub goal: u32,
}

impl Progress {
    pub fn new(completed: u32, goal: u32) -> Self {
        let goal = goal.max(1);
        Self {
            done: completed.min(goal),
            goal,
        }
    }

    pub fn ratio(&self) -> f64 {
        (self.done as f64 / self.goal as f64).clamp(0.0, 1.0)
    }

    pub fn percent(&self) -> u16 {
        (self.ratio() * 100.0).round() as u16
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.done, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_goal() {
        let p = Progress::new(10, 8);
        assert_eq!(p.label(), "8 / 8");
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn partial_progress() {
        let p = Progress::new(3, 12);
        assert_eq!(p.label(), "3 / 12");
        assert_eq!(p.percent(), 25);
    }

    #[test]
    fn zero_goal_is_treated_as_one() {
        assert_eq!(Progress::new(0, 0).label(), "0 / 1");
    }
}
