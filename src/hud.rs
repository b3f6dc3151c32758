use crate::renderer::Frame;

const CONTROLS: [&str; 5] = [
    "W: Forward",
    "S: Backward",
    "A: Turn Left",
    "D: Turn Right",
    "Q: Quit",
];

/// Place the 3-D view on the left and the score/controls panel to its right.
pub fn compose(view: &Frame, panel_width: usize, score: u32, fill: char) -> Frame {
    let mut screen = Frame::new(view.width() + panel_width, view.height(), fill);
    screen.blit(view, 0, 0);

    let panel_x = view.width() + 2;
    screen.put_str(panel_x, 1, "SCORE");
    screen.put_str(panel_x, 2, &score.to_string());
    screen.put_str(panel_x, 4, "CONTROLS");
    for (i, line) in CONTROLS.iter().enumerate() {
        screen.put_str(panel_x, 5 + i, line);
    }
    screen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_layout() {
        let view = Frame::new(4, 12, '#');
        let screen = compose(&view, 20, 42, ' ');
        assert_eq!(screen.width(), 24);
        assert_eq!(screen.row(0), format!("####{}", " ".repeat(20)));
        assert!(screen.row(1).starts_with("####  SCORE"));
        assert!(screen.row(2).starts_with("####  42 "));
        assert!(screen.row(9).starts_with("####  Q: Quit"));
    }

    #[test]
    fn panel_text_is_clipped() {
        let view = Frame::new(2, 3, '#');
        let screen = compose(&view, 6, 7, ' ');
        assert_eq!(screen.rows(), vec!["##      ", "##  SCOR", "##  7   "]);
    }
}
