use crate::popup::rows::Row;

/// Distance from the pointer to the panel's top-left corner.
pub const POINTER_OFFSET: (u16, u16) = (15, 0);

/// Floating subject/body preview for the hovered template row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewTooltip {
    pub visible: bool,
    pub subject: String,
    pub body: String,
    pub x: u16,
    pub y: u16,
}

impl PreviewTooltip {
    pub fn on_enter(&mut self, row: &Row) {
        self.subject = row.attr("subject").unwrap_or_default().to_string();
        self.body = row.attr("body").unwrap_or_default().to_string();
        self.visible = true;
    }

    pub fn on_move(&mut self, x: u16, y: u16) {
        if !self.visible {
            return;
        }
        self.x = x.saturating_add(POINTER_OFFSET.0);
        self.y = y.saturating_add(POINTER_OFFSET.1);
    }

    pub fn on_leave(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, Template};
    use crate::popup::rows::{SelectMode, render_list};

    fn row() -> Row {
        let t = Template {
            id: RecordId::new("1"),
            title: "Intro".into(),
            subject: "Nice to meet you".into(),
            body: "Hello!".into(),
        };
        render_list(&[t], SelectMode::ActionOnly, |_| false, "")
            .item(0)
            .cloned()
            .expect("row")
    }

    #[test]
    fn enter_move_leave_cycle() {
        let mut tip = PreviewTooltip::default();
        tip.on_move(3, 3);
        assert!(!tip.visible);

        tip.on_enter(&row());
        assert!(tip.visible);
        assert_eq!(tip.subject, "Nice to meet you");
        assert_eq!(tip.body, "Hello!");

        tip.on_move(10, 4);
        assert_eq!((tip.x, tip.y), (25, 4));

        tip.on_leave();
        assert_eq!(tip, PreviewTooltip::default());
    }
}
